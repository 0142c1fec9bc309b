//! `goingenv init` — create the archive directory in the current project.

use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;

use crate::cli::{gitignore, output};
use crate::config::{self, Settings};
use crate::errors::Result;

/// Execute the `init` command.
pub fn execute(force: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let archive_dir = config::archive_dir(&cwd);

    if config::is_initialized(&cwd) && !force {
        output::warning("goingenv is already initialized in this directory");
        output::tip("Use `goingenv init --force` to reinitialize");
        return Ok(());
    }

    if !archive_dir.exists() {
        DirBuilder::new().mode(0o700).create(&archive_dir)?;
    }

    // Archives in this directory are meant to be committed; the gitignore
    // only excludes scratch files.
    gitignore::ensure_archive_gitignore(&archive_dir);

    // Seed a config file with the default scan settings so they are easy
    // to adjust. An existing config is left alone.
    if !cwd.join(Settings::FILE_NAME).exists() {
        Settings::default().save(&cwd)?;
    }

    output::success(&format!("Initialized {}", archive_dir.display()));
    output::tip("Run `goingenv status` to see detected files");
    output::tip("Run `goingenv pack` to create an encrypted archive");
    Ok(())
}
