//! `goingenv pack` — scan, confirm, encrypt, write.

use std::path::PathBuf;

use chrono::Local;
use dialoguer::Confirm;

use crate::archive::{self, PackOptions};
use crate::cli::{output, require_initialized, resolve_new_password, resolve_output_path};
use crate::config::Settings;
use crate::errors::{Error, Result};
use crate::scanner;

/// Flags collected from the command line.
pub struct PackArgs {
    pub directory: Option<PathBuf>,
    pub output: Option<String>,
    pub depth: Option<usize>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub description: Option<String>,
    pub dry_run: bool,
    pub yes: bool,
    pub password_env: Option<String>,
    pub verbose: bool,
}

/// Execute the `pack` command.
pub fn execute(args: &PackArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    require_initialized(&cwd)?;

    let settings = Settings::load(&cwd)?;
    let root = args.directory.clone().unwrap_or_else(|| cwd.clone());

    let mut scan_options = settings.scan_options(&root);
    if let Some(depth) = args.depth {
        scan_options.max_depth = depth;
    }
    scan_options
        .include_patterns
        .extend(args.include.iter().cloned());
    scan_options
        .file_exclude_patterns
        .extend(args.exclude.iter().cloned());

    if args.verbose {
        output::info(&format!("Scanning {}...", root.display()));
    }
    let files = scanner::scan(&scan_options)?;

    if files.is_empty() {
        output::warning("No environment files found");
        output::tip("Use `goingenv status` to see what files are detected");
        return Ok(());
    }

    display_files(&files, args.verbose);

    let output_path = resolve_output_path(&cwd, args.output.as_deref());

    if args.dry_run {
        output::success(&format!(
            "Dry run: would pack {} files into {}",
            files.len(),
            output_path.display()
        ));
        return Ok(());
    }

    if !args.yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Pack {} files into {}?",
                files.len(),
                output_path.display()
            ))
            .default(true)
            .interact()
            .map_err(|e| Error::Command(format!("confirmation prompt: {e}")))?;
        if !proceed {
            output::warning("Operation cancelled");
            return Ok(());
        }
    }

    let password = resolve_new_password(args.password_env.as_deref())?;
    let description = args.description.clone().unwrap_or_else(|| {
        format!(
            "Environment files archive created on {} from {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            root.display()
        )
    });

    archive::pack(&PackOptions {
        files,
        output_path: output_path.clone(),
        password,
        description,
    })?;

    output::success(&format!("Created {}", output_path.display()));
    if args.verbose {
        if let Ok(meta) = output_path.metadata() {
            output::item(&format!("Size: {}", output::format_size(meta.len())));
        }
    }
    output::tip("Store your password securely — it cannot be recovered");
    Ok(())
}

/// Show the files about to be packed: everything when verbose, otherwise
/// the first five with a count of the rest.
fn display_files(files: &[scanner::EnvFile], verbose: bool) {
    output::info(&format!("Packing {} files", files.len()));
    for (i, file) in files.iter().enumerate() {
        if verbose {
            output::item(&format!(
                "{} ({})",
                file.relative_path,
                output::format_size(file.size)
            ));
        } else if i < 5 {
            output::item(&file.relative_path);
        } else {
            output::item(&format!("... and {} more files", files.len() - 5));
            break;
        }
    }
}
