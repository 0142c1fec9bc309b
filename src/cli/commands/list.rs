//! `goingenv list` — show archive contents without extracting.

use std::path::PathBuf;

use crate::archive;
use crate::cli::{output, require_initialized, resolve_archive_path, resolve_password};
use crate::config;
use crate::errors::Result;

/// Flags collected from the command line.
pub struct ListArgs {
    pub file: Option<PathBuf>,
    pub all: bool,
    pub password_env: Option<String>,
}

/// Execute the `list` command.
pub fn execute(args: &ListArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    require_initialized(&cwd)?;

    let password = resolve_password(args.password_env.as_deref())?;

    if args.all {
        let archives = archive::available_archives(&config::archive_dir(&cwd))?;
        if archives.is_empty() {
            output::warning("No archives found");
            output::tip("Run `goingenv pack` to create one");
            return Ok(());
        }
        for path in &archives {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match archive::list(path, &password) {
                Ok(meta) => output::info(&format!(
                    "{name}: {} files, {}, created {}",
                    meta.files.len(),
                    output::format_size(meta.total_size),
                    meta.created_at.format("%Y-%m-%d %H:%M:%S")
                )),
                Err(e) => output::warning(&format!("{name}: {e}")),
            }
        }
        return Ok(());
    }

    let archive_path = resolve_archive_path(&cwd, args.file.as_deref())?;
    let metadata = archive::list(&archive_path, &password)?;

    output::info(&format!("Archive {}", archive_path.display()));
    output::print_archive_details(&metadata);
    Ok(())
}
