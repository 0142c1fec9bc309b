//! Project configuration: scan defaults and archive-directory layout.

pub mod settings;

pub use settings::{
    archive_dir, default_archive_name, is_initialized, Settings, ARCHIVE_DIR,
};
