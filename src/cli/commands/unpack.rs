//! `goingenv unpack` — decrypt an archive and restore its files.

use std::path::PathBuf;

use crate::archive::{self, UnpackOptions};
use crate::cli::{output, require_initialized, resolve_archive_path, resolve_password};
use crate::errors::Result;

/// Flags collected from the command line.
pub struct UnpackArgs {
    pub file: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub overwrite: bool,
    pub backup: bool,
    pub password_env: Option<String>,
    pub verbose: bool,
}

/// Execute the `unpack` command.
pub fn execute(args: &UnpackArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    require_initialized(&cwd)?;

    let archive_path = resolve_archive_path(&cwd, args.file.as_deref())?;
    let target_dir = args.target.clone().unwrap_or(cwd);
    let password = resolve_password(args.password_env.as_deref())?;

    output::info(&format!("Unpacking {}", archive_path.display()));

    let report = archive::unpack(&UnpackOptions {
        archive_path,
        target_dir,
        password,
        overwrite: args.overwrite,
        backup: args.backup,
    })?;

    for skipped in &report.skipped {
        output::warning(&format!(
            "Skipped existing file: {} (use --overwrite to replace)",
            skipped.display()
        ));
    }
    if args.verbose {
        for written in &report.written {
            output::item(&written.display().to_string());
        }
    }

    output::success(&format!(
        "Restored {} files ({} skipped)",
        report.written.len(),
        report.skipped.len()
    ));
    Ok(())
}
