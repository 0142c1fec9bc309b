//! Archive orchestration: pack, unpack, list, and archive discovery.
//!
//! The orchestrators drive scanner output through the ustar codec and the
//! cryptographic envelope. They are synchronous and keep no state between
//! invocations; the only collaborator is the [`Cryptor`] they own.

pub mod codec;
pub mod path_safety;

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::crypto::{Cryptor, PasswordCryptor};
use crate::errors::{ArchiveError, Result};
use crate::scanner::EnvFile;

pub use codec::{Archive, EntryInfo, FORMAT_VERSION, METADATA_ENTRY};
pub use path_safety::safe_join;

/// File extension for encrypted archives.
pub const ARCHIVE_EXTENSION: &str = ".enc";

/// Input to [`pack`].
pub struct PackOptions {
    /// Files to pack, in the order they will be stored.
    pub files: Vec<EnvFile>,

    /// Where the encrypted archive is written.
    pub output_path: PathBuf,

    /// Archive password; wiped from memory on drop.
    pub password: Zeroizing<String>,

    /// Free-form description stored in the metadata.
    pub description: String,
}

/// Input to [`unpack`].
pub struct UnpackOptions {
    /// Encrypted archive to read.
    pub archive_path: PathBuf,

    /// Directory entries are extracted into.
    pub target_dir: PathBuf,

    /// Archive password; wiped from memory on drop.
    pub password: Zeroizing<String>,

    /// Replace existing files instead of skipping them.
    pub overwrite: bool,

    /// When overwriting, first rename the existing file to `<name>.backup`.
    pub backup: bool,
}

/// What an unpack actually did. Skips are data, not log lines, so the
/// front-end decides how to render them.
#[derive(Debug, Default)]
pub struct UnpackReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Orchestrator owning its cryptor (plain constructor injection).
pub struct Archiver<C: Cryptor> {
    crypto: C,
}

impl<C: Cryptor> Archiver<C> {
    pub fn new(crypto: C) -> Self {
        Self { crypto }
    }

    /// Build the container, encrypt it, and write the ciphertext to
    /// `options.output_path` atomically with owner-only permissions.
    pub fn pack(&self, options: &PackOptions) -> Result<()> {
        if options.files.is_empty() {
            return Err(ArchiveError::Empty.into());
        }

        let plaintext = codec::build(&options.files, &options.description)?;
        let ciphertext = self
            .crypto
            .encrypt(&plaintext, options.password.as_bytes())?;

        write_atomic(&options.output_path, &ciphertext)
    }

    /// Decrypt the archive and extract every payload entry into
    /// `options.target_dir`.
    ///
    /// Entry names are validated in a full first pass before anything is
    /// written; an unsafe name anywhere aborts the unpack with zero files
    /// on disk.
    pub fn unpack(&self, options: &UnpackOptions) -> Result<UnpackReport> {
        let ciphertext = fs::read(&options.archive_path).map_err(|source| ArchiveError::Io {
            op: "read",
            path: options.archive_path.clone(),
            source,
        })?;
        let plaintext = self
            .crypto
            .decrypt(&ciphertext, options.password.as_bytes())?;

        codec::extract(&plaintext, |info, _payload| {
            path_safety::safe_join(&options.target_dir, &info.name)?;
            Ok(())
        })?;

        let mut report = UnpackReport::default();
        codec::extract(&plaintext, |info, payload| {
            // A stray payload entry reusing the metadata name is not a file.
            if info.name == METADATA_ENTRY {
                return Ok(());
            }
            let target = path_safety::safe_join(&options.target_dir, &info.name)?;
            ensure_parent_dir(&target)?;

            if target.exists() {
                if !options.overwrite {
                    report.skipped.push(target);
                    return Ok(());
                }
                if options.backup {
                    backup_existing(&target)?;
                }
            }

            write_entry(&target, info, payload)?;
            report.written.push(target);
            Ok(())
        })?;

        Ok(report)
    }

    /// Decrypt the archive and return its metadata. Never touches the
    /// filesystem beyond reading the archive itself.
    pub fn list(&self, archive_path: &Path, password: &str) -> Result<Archive> {
        let ciphertext = fs::read(archive_path).map_err(|source| ArchiveError::Io {
            op: "read",
            path: archive_path.to_path_buf(),
            source,
        })?;
        let plaintext = self.crypto.decrypt(&ciphertext, password.as_bytes())?;
        codec::read_metadata(&plaintext)
    }
}

/// Pack with the production cryptor.
pub fn pack(options: &PackOptions) -> Result<()> {
    Archiver::new(PasswordCryptor).pack(options)
}

/// Unpack with the production cryptor.
pub fn unpack(options: &UnpackOptions) -> Result<UnpackReport> {
    Archiver::new(PasswordCryptor).unpack(options)
}

/// List with the production cryptor.
pub fn list(archive_path: &Path, password: &str) -> Result<Archive> {
    Archiver::new(PasswordCryptor).list(archive_path, password)
}

/// Enumerate the `.enc` files directly under `dir`.
///
/// A missing directory yields an empty list, not an error. No recursion.
pub fn available_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    if !dir.exists() {
        return Ok(archives);
    }

    let read_err = |source| ArchiveError::Io {
        op: "read",
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_file = entry.file_type().map_err(read_err)?.is_file();
        if is_file
            && entry
                .file_name()
                .to_string_lossy()
                .ends_with(ARCHIVE_EXTENSION)
        {
            archives.push(entry.path());
        }
    }

    Ok(archives)
}

/// Write `data` to `path` via a same-directory temp file: 0600 from the
/// first byte, fsynced, then renamed into place. A failure never leaves a
/// partial file at `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = write_exclusive(&tmp, data).and_then(|()| {
        fs::rename(&tmp, path).map_err(|source| ArchiveError::Io {
            op: "rename",
            path: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(Into::into)
}

fn write_exclusive(path: &Path, data: &[u8]) -> std::result::Result<(), ArchiveError> {
    let io_err = |source| ArchiveError::Io {
        op: "write",
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(io_err)?;
    file.write_all(data).map_err(io_err)?;
    file.sync_all().map_err(io_err)
}

/// Create the target's parent chain with owner-only (0700) directories.
fn ensure_parent_dir(target: &Path) -> Result<()> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };
    DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(parent)
        .map_err(|source| {
            ArchiveError::Io {
                op: "create directory",
                path: parent.to_path_buf(),
                source,
            }
            .into()
        })
}

/// Rename an existing file to `<name>.backup`. Failure aborts the unpack.
fn backup_existing(target: &Path) -> Result<()> {
    let mut backup = target.as_os_str().to_os_string();
    backup.push(".backup");
    fs::rename(target, PathBuf::from(backup)).map_err(|source| {
        ArchiveError::Io {
            op: "back up",
            path: target.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Stream one payload into place, then clamp permissions and restore the
/// recorded mtime.
fn write_entry(target: &Path, info: &EntryInfo, payload: &mut dyn Read) -> Result<()> {
    let io_err = |op: &'static str| {
        move |source| ArchiveError::Io {
            op,
            path: target.to_path_buf(),
            source,
        }
    };

    let mut out = File::create(target).map_err(io_err("create"))?;
    io::copy(payload, &mut out).map_err(io_err("write"))?;

    // Never broader than owner read/write; 0600 when the entry carried no
    // mode bits at all.
    let mut mode = (info.mode & 0o777) & 0o600;
    if mode == 0 {
        mode = 0o600;
    }
    out.set_permissions(fs::Permissions::from_mode(mode))
        .map_err(io_err("set permissions on"))?;
    out.set_modified(info.mod_time)
        .map_err(io_err("set modification time on"))?;

    Ok(())
}
