//! ustar container framing.
//!
//! An archive is a plain POSIX tar stream whose first entry is always
//! `metadata.json`, followed by one entry per file in the same order as the
//! metadata's `files` list. Keeping the framing standard means the format
//! stays diagnosable with ordinary tar tooling once decrypted.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ArchiveError, Result};
use crate::scanner::EnvFile;

/// Name of the mandatory first entry.
pub const METADATA_ENTRY: &str = "metadata.json";

/// Container format version written into new archives.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Archive metadata carried inside the encrypted blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    /// Wall-clock creation time.
    pub created_at: DateTime<Utc>,

    /// Format version (currently `"1.0.0"`).
    pub version: String,

    /// Free-form human description; may be empty.
    pub description: String,

    /// Entries in the same order as the file payloads that follow.
    pub files: Vec<EnvFile>,

    /// Sum of all file sizes.
    pub total_size: u64,
}

/// Header fields of one payload entry, handed to the extract callback.
pub struct EntryInfo {
    pub name: String,
    pub mode: u32,
    pub mod_time: SystemTime,
}

fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> ArchiveError + 'a {
    move |source| ArchiveError::Io {
        op,
        path: path.to_path_buf(),
        source,
    }
}

/// Serialize metadata plus file payloads into one contiguous tar stream.
///
/// The stream is spooled through a temporary file so archives larger than
/// memory can be built; only the finished stream is materialized for the
/// single-shot encrypter.
pub fn build(files: &[EnvFile], description: &str) -> Result<Vec<u8>> {
    let created_at = Utc::now();
    let archive = Archive {
        created_at,
        version: FORMAT_VERSION.to_string(),
        description: description.to_string(),
        files: files.to_vec(),
        total_size: files.iter().map(|f| f.size).sum(),
    };

    let spool_path = std::env::temp_dir();
    let spool = tempfile::tempfile().map_err(io_err("create spool in", &spool_path))?;
    let mut builder = tar::Builder::new(spool);

    write_metadata(&mut builder, &archive)?;
    for file in files {
        write_file(&mut builder, file)?;
    }

    let mut spool = builder
        .into_inner()
        .map_err(io_err("finalize spool in", &spool_path))?;
    spool
        .seek(SeekFrom::Start(0))
        .map_err(io_err("rewind spool in", &spool_path))?;

    let mut plaintext = Vec::new();
    spool
        .read_to_end(&mut plaintext)
        .map_err(io_err("read spool in", &spool_path))?;
    Ok(plaintext)
}

fn write_metadata(builder: &mut tar::Builder<File>, archive: &Archive) -> Result<()> {
    let metadata = serde_json::to_vec(archive)
        .map_err(|e| ArchiveError::Format(format!("serializing metadata: {e}")))?;

    let mut header = tar::Header::new_ustar();
    header.set_size(metadata.len() as u64);
    header.set_mode(0o600);
    header.set_mtime(archive.created_at.timestamp().max(0) as u64);

    builder
        .append_data(&mut header, METADATA_ENTRY, metadata.as_slice())
        .map_err(io_err("write metadata to", Path::new(METADATA_ENTRY)))?;
    Ok(())
}

/// Append one file payload. Mode, mtime, and contents are taken from the
/// file as it is *now*, matching the read the payload streams from.
fn write_file(builder: &mut tar::Builder<File>, file: &EnvFile) -> Result<()> {
    let source = File::open(&file.path).map_err(io_err("open", &file.path))?;
    let metadata = source.metadata().map_err(io_err("stat", &file.path))?;

    let mtime = metadata
        .modified()
        .map_err(io_err("stat", &file.path))?
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut header = tar::Header::new_ustar();
    header.set_size(metadata.len());
    header.set_mode(metadata.permissions().mode() & 0o777);
    header.set_mtime(mtime);

    builder
        .append_data(&mut header, &file.relative_path, source)
        .map_err(io_err("write to archive", &file.path))?;
    Ok(())
}

/// Parse the metadata entry of a decrypted archive stream.
///
/// The first entry must be named `metadata.json`; anything else is a
/// format error.
pub fn read_metadata(blob: &[u8]) -> Result<Archive> {
    let mut archive = tar::Archive::new(Cursor::new(blob));
    let mut entries = archive
        .entries()
        .map_err(|e| ArchiveError::Format(format!("reading entries: {e}")))?;

    let entry = entries
        .next()
        .ok_or_else(|| ArchiveError::Format("archive is empty".to_string()))?
        .map_err(|e| ArchiveError::Format(format!("reading first entry: {e}")))?;

    let name = entry
        .path()
        .map_err(|e| ArchiveError::Format(format!("reading first entry name: {e}")))?
        .to_string_lossy()
        .into_owned();
    if name != METADATA_ENTRY {
        return Err(ArchiveError::Format(format!(
            "first entry must be {METADATA_ENTRY}, found {name:?}"
        ))
        .into());
    }

    let metadata = serde_json::from_reader(entry)
        .map_err(|e| ArchiveError::Format(format!("parsing metadata: {e}")))?;
    Ok(metadata)
}

/// Walk every payload entry after `metadata.json`, calling `handler` with
/// the entry's header fields and a reader over its payload.
///
/// The handler's error aborts the walk and is returned as-is.
pub fn extract<F>(blob: &[u8], mut handler: F) -> Result<()>
where
    F: FnMut(&EntryInfo, &mut dyn Read) -> Result<()>,
{
    let mut archive = tar::Archive::new(Cursor::new(blob));
    let entries = archive
        .entries()
        .map_err(|e| ArchiveError::Format(format!("reading entries: {e}")))?;

    for (index, entry) in entries.enumerate() {
        let mut entry =
            entry.map_err(|e| ArchiveError::Format(format!("reading entry: {e}")))?;

        let header = entry.header();
        let name = entry
            .path()
            .map_err(|e| ArchiveError::Format(format!("reading entry name: {e}")))?
            .to_string_lossy()
            .into_owned();

        if index == 0 {
            if name != METADATA_ENTRY {
                return Err(ArchiveError::Format(format!(
                    "first entry must be {METADATA_ENTRY}, found {name:?}"
                ))
                .into());
            }
            continue;
        }

        let info = EntryInfo {
            mode: header.mode().unwrap_or(0o600),
            mod_time: UNIX_EPOCH + std::time::Duration::from_secs(header.mtime().unwrap_or(0)),
            name,
        };
        handler(&info, &mut entry)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use std::fs;
    use tempfile::TempDir;

    fn scan_fixture(dir: &TempDir) -> Vec<EnvFile> {
        fs::write(dir.path().join(".env"), "A=1\n").unwrap();
        fs::write(dir.path().join(".env.local"), "B=2\n").unwrap();
        scanner::scan(&scanner::ScanOptions {
            root_path: dir.path().to_path_buf(),
            max_depth: 3,
            max_file_size: 1024 * 1024,
            include_patterns: vec![r"\.env.*".to_string()],
            file_exclude_patterns: vec![],
            dir_exclude_patterns: vec![],
        })
        .unwrap()
    }

    #[test]
    fn metadata_is_the_first_entry() {
        let dir = TempDir::new().unwrap();
        let files = scan_fixture(&dir);
        let blob = build(&files, "test archive").unwrap();

        let mut archive = tar::Archive::new(Cursor::new(blob.as_slice()));
        let first = archive.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.path().unwrap().to_string_lossy(), METADATA_ENTRY);
    }

    #[test]
    fn metadata_round_trips_through_the_container() {
        let dir = TempDir::new().unwrap();
        let files = scan_fixture(&dir);
        let blob = build(&files, "round trip").unwrap();

        let meta = read_metadata(&blob).unwrap();
        assert_eq!(meta.version, FORMAT_VERSION);
        assert_eq!(meta.description, "round trip");
        assert_eq!(meta.files.len(), 2);
        assert_eq!(meta.total_size, 8);
    }

    #[test]
    fn payload_order_matches_metadata_order() {
        let dir = TempDir::new().unwrap();
        let files = scan_fixture(&dir);
        let blob = build(&files, "").unwrap();
        let meta = read_metadata(&blob).unwrap();

        let mut seen = Vec::new();
        extract(&blob, |info, _payload| {
            seen.push(info.name.clone());
            Ok(())
        })
        .unwrap();

        let expected: Vec<String> = meta.files.iter().map(|f| f.relative_path.clone()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn extract_streams_the_exact_payload_bytes() {
        let dir = TempDir::new().unwrap();
        let files = scan_fixture(&dir);
        let blob = build(&files, "").unwrap();

        let mut contents = std::collections::HashMap::new();
        extract(&blob, |info, payload| {
            let mut buf = Vec::new();
            payload.read_to_end(&mut buf).unwrap();
            contents.insert(info.name.clone(), buf);
            Ok(())
        })
        .unwrap();

        assert_eq!(contents[".env"], b"A=1\n");
        assert_eq!(contents[".env.local"], b"B=2\n");
    }

    #[test]
    fn wrong_first_entry_is_a_format_error() {
        // Craft a tar whose first entry is a regular file.
        let mut builder = tar::Builder::new(Vec::new());
        let data = b"not metadata";
        let mut header = tar::Header::new_ustar();
        header.set_size(data.len() as u64);
        header.set_mode(0o600);
        builder.append_data(&mut header, ".env", &data[..]).unwrap();
        let blob = builder.into_inner().unwrap();

        assert!(read_metadata(&blob).is_err());
        assert!(extract(&blob, |_, _| Ok(())).is_err());
    }
}
