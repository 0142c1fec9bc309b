//! CLI module — Clap argument parser, output helpers, and command
//! implementations.

pub mod commands;
pub mod gitignore;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config;
use crate::errors::{Error, Result};

/// Environment variable consulted for the password when no
/// `--password-env` flag names another one.
pub const PASSWORD_ENV_VAR: &str = "GOINGENV_PASSWORD";

/// goingenv CLI: encrypted, committable env-file archives.
#[derive(Parser)]
#[command(
    name = "goingenv",
    about = "Package environment files into encrypted archives that are safe to commit",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize goingenv in the current directory
    Init {
        /// Force initialization even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// Show detected environment files and available archives
    Status,

    /// Pack and encrypt environment files
    Pack {
        /// Directory to scan (default: current directory)
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Output archive name (default: auto-generated with timestamp)
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum directory depth to scan (default: from config)
        #[arg(long)]
        depth: Option<usize>,

        /// Additional file patterns to include
        #[arg(short, long)]
        include: Vec<String>,

        /// Additional file patterns to exclude
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Archive description (default: auto-generated)
        #[arg(long)]
        description: Option<String>,

        /// Show what would be packed without creating an archive
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Read the password from this environment variable
        #[arg(long)]
        password_env: Option<String>,

        /// Show detailed information during packing
        #[arg(short, long)]
        verbose: bool,
    },

    /// Decrypt and restore files from an archive
    Unpack {
        /// Archive file (default: newest archive in .goingenv)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Directory to restore into (default: current directory)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Replace existing files instead of skipping them
        #[arg(long)]
        overwrite: bool,

        /// Back up existing files to <name>.backup before overwriting
        #[arg(long)]
        backup: bool,

        /// Read the password from this environment variable
        #[arg(long)]
        password_env: Option<String>,

        /// Show every restored file
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the contents of an archive without extracting
    List {
        /// Archive file (default: newest archive in .goingenv)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// List every archive in .goingenv
        #[arg(short, long)]
        all: bool,

        /// Read the password from this environment variable
        #[arg(long)]
        password_env: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the archive password, trying in order:
/// 1. The variable named by `--password-env` (required to be set if named).
/// 2. `GOINGENV_PASSWORD` (CI/CD friendly).
/// 3. Interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on
/// drop.
pub fn resolve_password(password_env: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(var) = password_env {
        return match std::env::var(var) {
            Ok(pw) if !pw.is_empty() => Ok(Zeroizing::new(pw)),
            _ => Err(Error::Command(format!(
                "environment variable {var} is not set or empty"
            ))),
        };
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV_VAR) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter archive password")
        .interact()
        .map_err(|e| Error::Command(format!("password prompt: {e}")))?;
    non_empty(pw)
}

/// Like [`resolve_password`], but the interactive path asks twice. Used
/// when creating a new archive, where a typo would be unrecoverable.
pub fn resolve_new_password(password_env: Option<&str>) -> Result<Zeroizing<String>> {
    if password_env.is_some() || std::env::var(PASSWORD_ENV_VAR).is_ok_and(|pw| !pw.is_empty()) {
        return resolve_password(password_env);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Choose archive password")
        .with_confirmation("Confirm archive password", "Passwords do not match, try again")
        .interact()
        .map_err(|e| Error::Command(format!("password prompt: {e}")))?;
    non_empty(pw)
}

fn non_empty(pw: String) -> Result<Zeroizing<String>> {
    if pw.is_empty() {
        return Err(Error::Command("password must not be empty".to_string()));
    }
    Ok(Zeroizing::new(pw))
}

/// Error out unless `goingenv init` has been run in `project_dir`.
pub fn require_initialized(project_dir: &Path) -> Result<()> {
    if config::is_initialized(project_dir) {
        return Ok(());
    }
    Err(Error::Command(
        "goingenv is not initialized here — run `goingenv init` first".to_string(),
    ))
}

/// Resolve the output path for a new archive.
///
/// `None` picks a timestamped name inside `.goingenv/`; a relative name
/// lands inside `.goingenv/`; an absolute path is used as-is.
pub fn resolve_output_path(project_dir: &Path, output: Option<&str>) -> PathBuf {
    let archive_dir = config::archive_dir(project_dir);
    match output {
        None => archive_dir.join(config::default_archive_name()),
        Some(name) => {
            let path = Path::new(name);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                archive_dir.join(path)
            }
        }
    }
}

/// Pick the archive to operate on: an explicit `--file`, or the newest
/// `.enc` in the project's archive directory.
pub fn resolve_archive_path(project_dir: &Path, file: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = file {
        if path.is_absolute() || path.exists() {
            return Ok(path.to_path_buf());
        }
        // A bare name refers to an archive inside .goingenv/.
        return Ok(config::archive_dir(project_dir).join(path));
    }

    let mut archives = crate::archive::available_archives(&config::archive_dir(project_dir))?;
    archives.sort_by_key(|p| {
        p.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });
    archives.pop().ok_or_else(|| {
        Error::Command("no archives found — run `goingenv pack` first".to_string())
    })
}
