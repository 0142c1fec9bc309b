//! Styled terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::archive::Archive;
use crate::scanner::EnvFile;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print an indented list item.
pub fn item(msg: &str) {
    println!("  {} {}", style("\u{2022}").dim(), msg);
}

/// Human-readable byte count: `512 B`, `1.0 KB`, `1.5 MB`, ...
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / UNIT as f64;
    for unit in ["KB", "MB", "GB", "TB"] {
        if value < UNIT as f64 {
            return format!("{value:.1} {unit}");
        }
        value /= UNIT as f64;
    }
    format!("{value:.1} PB")
}

/// Print a table of scanned/archived files (Path, Size, Modified).
pub fn print_files_table(files: &[EnvFile]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Path", "Size", "Modified"]);

    for f in files {
        table.add_row(vec![
            f.relative_path.clone(),
            format_size(f.size),
            f.mod_time.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Print archive metadata followed by its file table.
pub fn print_archive_details(archive: &Archive) {
    info(&format!(
        "Created {} (format {})",
        archive.created_at.format("%Y-%m-%d %H:%M:%S"),
        archive.version
    ));
    if !archive.description.is_empty() {
        info(&archive.description);
    }
    info(&format!(
        "{} files, {} total",
        archive.files.len(),
        format_size(archive.total_size)
    ));
    print_files_table(&archive.files);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_vectors() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
