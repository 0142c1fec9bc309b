use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::archive::ARCHIVE_EXTENSION;
use crate::errors::{Error, Result, ValidationError};
use crate::scanner::ScanOptions;

/// Name of the project subdirectory holding encrypted archives.
pub const ARCHIVE_DIR: &str = ".goingenv";

/// Project-level scan defaults, loaded from `.goingenv.json`.
///
/// Every field has a sensible default so the tool works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Maximum directory depth to scan (default: 3).
    #[serde(default = "default_depth")]
    pub default_depth: usize,

    /// Per-file size ceiling in bytes (default: 10 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// File-name patterns to include (default: `\.env.*`).
    #[serde(default = "default_env_patterns")]
    pub env_patterns: Vec<String>,

    /// File-name patterns to exclude (default: `\.env\.example`).
    #[serde(default = "default_env_exclude_patterns")]
    pub env_exclude_patterns: Vec<String>,

    /// Directory patterns to prune (default: node_modules, vendor, .git).
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_depth() -> usize {
    3
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_env_patterns() -> Vec<String> {
    vec![r"\.env.*".to_string()]
}

fn default_env_exclude_patterns() -> Vec<String> {
    vec![r"\.env\.example".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "node_modules/".to_string(),
        "vendor/".to_string(),
        r"\.git/".to_string(),
    ]
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_file_size: default_max_file_size(),
            env_patterns: default_env_patterns(),
            env_exclude_patterns: default_env_exclude_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".goingenv.json";

    /// Load settings from `<project_dir>/.goingenv.json`.
    ///
    /// If the file does not exist, defaults are returned. If the file
    /// exists but cannot be parsed or fails validation, an error is
    /// returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            Error::Config(format!("failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Write the settings to `<project_dir>/.goingenv.json` as pretty JSON.
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        self.validate()?;
        let config_path = project_dir.join(Self::FILE_NAME);
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize settings: {e}")))?;
        fs::write(&config_path, contents + "\n")?;
        Ok(())
    }

    /// Reject values the scanner cannot sensibly work with.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if !(1..=10).contains(&self.default_depth) {
            return Err(ValidationError::Depth {
                got: self.default_depth,
            });
        }
        if self.max_file_size == 0 {
            return Err(ValidationError::MaxFileSize);
        }
        if self.env_patterns.is_empty() {
            return Err(ValidationError::NoPatterns);
        }
        Ok(())
    }

    /// Turn these settings into scanner options for `root`.
    pub fn scan_options(&self, root: &Path) -> ScanOptions {
        ScanOptions {
            root_path: root.to_path_buf(),
            max_depth: self.default_depth,
            max_file_size: self.max_file_size,
            include_patterns: self.env_patterns.clone(),
            file_exclude_patterns: self.env_exclude_patterns.clone(),
            dir_exclude_patterns: self.exclude_patterns.clone(),
        }
    }
}

/// Path of the archive directory inside a project.
pub fn archive_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(ARCHIVE_DIR)
}

/// A project counts as initialized once its archive directory exists.
pub fn is_initialized(project_dir: &Path) -> bool {
    archive_dir(project_dir).is_dir()
}

/// Timestamped default archive file name, e.g. `env-20260415-093042.enc`.
pub fn default_archive_name() -> String {
    format!(
        "env-{}{}",
        Local::now().format("%Y%m%d-%H%M%S"),
        ARCHIVE_EXTENSION
    )
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.default_depth, 3);
        assert_eq!(s.max_file_size, 10 * 1024 * 1024);
        assert!(!s.env_patterns.is_empty());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_depth, 3);
    }

    #[test]
    fn load_parses_json_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"{
            "default_depth": 5,
            "max_file_size": 5242880,
            "env_patterns": ["\\.env.*", "\\.secret"],
            "env_exclude_patterns": ["\\.env\\.example"],
            "exclude_patterns": ["node_modules/", "vendor/"]
        }"#;
        fs::write(tmp.path().join(Settings::FILE_NAME), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_depth, 5);
        assert_eq!(settings.max_file_size, 5 * 1024 * 1024);
        assert_eq!(settings.env_patterns.len(), 2);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), r#"{"default_depth": 5}"#).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.default_depth, 5);
        // Rest should be defaults
        assert_eq!(settings.max_file_size, 10 * 1024 * 1024);
        assert_eq!(settings.exclude_patterns.len(), 3);
    }

    #[test]
    fn load_errors_on_invalid_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "not valid {{json").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn depth_out_of_range_is_rejected() {
        let zero = Settings {
            default_depth: 0,
            ..Settings::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::Depth { got: 0 })
        ));

        let too_deep = Settings {
            default_depth: 100,
            ..Settings::default()
        };
        assert!(too_deep.validate().is_err());
    }

    #[test]
    fn zero_max_file_size_is_rejected() {
        let s = Settings {
            max_file_size: 0,
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(ValidationError::MaxFileSize)));
    }

    #[test]
    fn empty_include_patterns_are_rejected() {
        let s = Settings {
            env_patterns: vec![],
            ..Settings::default()
        };
        assert!(matches!(s.validate(), Err(ValidationError::NoPatterns)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings {
            default_depth: 4,
            ..Settings::default()
        };
        settings.save(tmp.path()).unwrap();

        let loaded = Settings::load(tmp.path()).unwrap();
        assert_eq!(loaded.default_depth, 4);
    }

    #[test]
    fn archive_name_carries_the_extension() {
        let name = default_archive_name();
        assert!(name.starts_with("env-"));
        assert!(name.ends_with(".enc"));
    }
}
