//! Where `settings.toml` lives.
//!
//! `GESTURE_CONTROL_HOME` wins when set; otherwise the platform config dir
//! from `dirs`:
//!
//! ```text
//! Windows: %APPDATA%\gesture-control\settings.toml
//! macOS:   ~/Library/Application Support/gesture-control/settings.toml
//! Linux:   ~/.config/gesture-control/settings.toml
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that overrides the settings directory.
pub const HOME_ENV: &str = "GESTURE_CONTROL_HOME";

const APP_NAME: &str = "gesture-control";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Resolve from the environment, falling back to the current directory
    /// when the platform has no config dir.
    pub fn new() -> Self {
        let dir = std::env::var_os(HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_NAME)
            });
        Self::in_dir(dir)
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let config_dir = dir.as_ref().to_path_buf();
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
