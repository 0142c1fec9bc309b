//! `goingenv status` — show detected env files and available archives.

use crate::archive;
use crate::cli::{output, require_initialized};
use crate::config::{self, Settings};
use crate::errors::Result;
use crate::scanner;

/// Execute the `status` command.
pub fn execute() -> Result<()> {
    let cwd = std::env::current_dir()?;
    require_initialized(&cwd)?;

    let settings = Settings::load(&cwd)?;
    let files = scanner::scan(&settings.scan_options(&cwd))?;

    if files.is_empty() {
        output::warning("No environment files detected");
        output::tip("Adjust patterns in .goingenv.json if files are missing");
    } else {
        let total: u64 = files.iter().map(|f| f.size).sum();
        output::info(&format!(
            "{} environment files detected ({})",
            files.len(),
            output::format_size(total)
        ));
        output::print_files_table(&files);
    }

    let archives = archive::available_archives(&config::archive_dir(&cwd))?;
    if archives.is_empty() {
        output::tip("No archives yet — run `goingenv pack` to create one");
    } else {
        output::info(&format!("{} archives in {}", archives.len(), config::ARCHIVE_DIR));
        for path in &archives {
            let size = path.metadata().map(|m| m.len()).unwrap_or(0);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            output::item(&format!("{name} ({})", output::format_size(size)));
        }
    }

    Ok(())
}
