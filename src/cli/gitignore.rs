//! `.gitignore` management for the archive directory.
//!
//! The `.gitignore` lives *inside* `.goingenv/` and must never ignore
//! `*.enc` files — encrypted archives are meant to be committed and shared
//! with the team. Only scratch files are excluded.

use std::fs;
use std::path::Path;

/// Lines written into a fresh `.goingenv/.gitignore`.
const GITIGNORE_CONTENT: &str = "# Scratch files from interrupted pack operations\n*.tmp\n*.backup\n";

/// Create `<dir>/.gitignore` if it does not exist yet.
///
/// An existing file is left untouched so users can add their own rules.
/// Write errors are non-fatal — the gitignore is a convenience, not a
/// requirement.
pub fn ensure_archive_gitignore(dir: &Path) {
    let gitignore_path = dir.join(".gitignore");
    if gitignore_path.exists() {
        return;
    }
    let _ = fs::write(&gitignore_path, GITIGNORE_CONTENT);
}
