//! Extraction path validation.
//!
//! Archive entry names are untrusted input. Every name is checked here
//! before a single byte is written to disk.

use std::path::{Component, Path, PathBuf};

use crate::errors::ArchiveError;

/// Validate an entry name against a target base directory and return the
/// absolute path it may be extracted to.
///
/// Rules (all must hold):
/// - the name is not absolute;
/// - the name contains no `..` segment;
/// - the joined path resolves lexically inside the base directory.
pub fn safe_join(base: &Path, name: &str) -> Result<PathBuf, ArchiveError> {
    let unsafe_path = || ArchiveError::UnsafePath(name.to_string());
    let rel = Path::new(name);

    if rel.is_absolute() || rel.has_root() {
        return Err(unsafe_path());
    }
    if rel.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(unsafe_path());
    }

    let abs_base = absolute(base)?;
    let target = absolute(&base.join(rel))?;

    // Component-wise containment, so `/base` can never admit `/base2`.
    if !target.starts_with(&abs_base) || target == abs_base {
        return Err(unsafe_path());
    }

    Ok(target)
}

/// Lexical absolutization. Symlinks are deliberately not resolved; the
/// check above is about what the name *says*, not what the filesystem
/// currently contains.
fn absolute(path: &Path) -> Result<PathBuf, ArchiveError> {
    std::path::absolute(path).map_err(|source| ArchiveError::Io {
        op: "resolve",
        path: path.to_path_buf(),
        source,
    })
}
