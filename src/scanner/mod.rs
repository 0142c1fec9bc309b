//! Filesystem scanner: bounded-depth traversal with regex-based
//! inclusion/exclusion and per-file integrity hashing.
//!
//! The scanner takes all of its configuration through [`ScanOptions`] —
//! it never reads process-wide state, so two scans with the same options
//! over the same tree behave identically.

pub mod checksum;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::errors::ScanError;

pub use checksum::file_checksum;

/// One scanned environment file.
///
/// `relative_path` is what gets stored in the archive and becomes the
/// reconstruction key on unpack; `path` is only used for reading the file
/// during pack and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvFile {
    /// Absolute filesystem path, for reading. Not part of the metadata.
    #[serde(skip)]
    pub path: PathBuf,

    /// Path relative to the scan root, with no leading `./` and no leading
    /// separator.
    pub relative_path: String,

    /// Byte count at scan time.
    pub size: u64,

    /// Last-modified timestamp at scan time.
    pub mod_time: DateTime<Utc>,

    /// 64-char lowercase hex SHA-256 over the file's bytes at scan time.
    pub checksum: String,
}

/// Input to [`scan`]. Defaults are supplied by the caller (see
/// `config::Settings`), not by the scanner.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory to walk.
    pub root_path: PathBuf,

    /// Maximum depth, measured as the number of separators in an entry's
    /// root-relative path. Entries deeper than this are pruned.
    pub max_depth: usize,

    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,

    /// A file is a candidate iff its base name matches at least one of
    /// these.
    pub include_patterns: Vec<String>,

    /// A candidate is dropped if its base name matches any of these.
    pub file_exclude_patterns: Vec<String>,

    /// A directory subtree is pruned if its root-relative path (with a
    /// trailing separator) matches any of these.
    pub dir_exclude_patterns: Vec<String>,
}

/// Compiled patterns for one scan invocation.
struct ScanContext {
    max_file_size: u64,
    include: Vec<Regex>,
    file_exclude: Vec<Regex>,
    dir_exclude: Vec<Regex>,
}

impl ScanContext {
    fn new(options: &ScanOptions) -> Result<Self, ScanError> {
        Ok(Self {
            max_file_size: options.max_file_size,
            include: compile_patterns(&options.include_patterns)?,
            file_exclude: compile_patterns(&options.file_exclude_patterns)?,
            dir_exclude: compile_patterns(&options.dir_exclude_patterns)?,
        })
    }

    /// Walk predicate: prune excluded directories, skip symlinks silently.
    /// The scan root itself is never matched against exclude patterns.
    fn keep_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if entry.file_type().is_symlink() {
            return false;
        }
        if entry.file_type().is_dir() {
            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => rel,
                Err(_) => return true,
            };
            // Trailing separator so patterns like `node_modules/` bind to
            // segment boundaries.
            let candidate = format!("{}/", rel.to_string_lossy());
            return !matches_any(&candidate, &self.dir_exclude);
        }
        true
    }
}

/// Enumerate all regular files beneath `options.root_path` that pass the
/// configured filters, in the walker's pre-order traversal order.
///
/// Symbolic links are neither followed nor included. Any filesystem error
/// aborts the scan; partial results are not returned.
pub fn scan(options: &ScanOptions) -> Result<Vec<EnvFile>, ScanError> {
    let ctx = ScanContext::new(options)?;
    let root = options.root_path.as_path();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(options.max_depth.saturating_add(1))
        .into_iter()
        .filter_entry(|entry| ctx.keep_entry(root, entry));

    let mut files = Vec::new();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            ScanError::Walk { path, source: e }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata().map_err(|e| ScanError::Walk {
            path: path.to_path_buf(),
            source: e,
        })?;

        if metadata.len() > ctx.max_file_size {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !matches_any(&name, &ctx.include) || matches_any(&name, &ctx.file_exclude) {
            continue;
        }

        let checksum = checksum::file_checksum(path)?;
        let mod_time = metadata.modified().map_err(|e| ScanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let relative_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        files.push(EnvFile {
            path: path.to_path_buf(),
            relative_path,
            size: metadata.len(),
            mod_time: DateTime::<Utc>::from(mod_time),
            checksum,
        });
    }

    Ok(files)
}

/// Compile a pattern list up front; an invalid pattern is a caller error,
/// not a runtime partial-failure.
fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ScanError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ScanError::BadPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn matches_any(candidate: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|p| p.is_match(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_pattern_is_reported_with_its_source() {
        let err = compile_patterns(&["[unclosed".to_string()]).unwrap_err();
        match err {
            ScanError::BadPattern { pattern, .. } => assert_eq!(pattern, "[unclosed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dir_exclude_binds_to_segment_boundary() {
        let patterns = compile_patterns(&["node_modules/".to_string()]).unwrap();
        assert!(matches_any("node_modules/", &patterns));
        assert!(matches_any("a/node_modules/", &patterns));
        // Without the trailing separator a file named `node_modules` in a
        // candidate string would not carry the separator.
        assert!(!matches_any("node_modules_backup", &patterns));
    }

    #[test]
    fn env_file_metadata_omits_the_absolute_path() {
        let file = EnvFile {
            path: PathBuf::from("/tmp/project/.env"),
            relative_path: ".env".to_string(),
            size: 12,
            mod_time: Utc::now(),
            checksum: "ab".repeat(32),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(!json.contains("/tmp/project"));
        assert!(json.contains("relative_path"));
    }
}
