// CLI configuration
// Loaded from ~/.config/kirzach-live/config.toml; every key is optional

use kirzach_config::ResolvedTheme;
use kirzach_notify::NotificationConfig;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Storage file (overrides the default location)
    pub storage: Option<PathBuf>,

    /// Platform color scheme to report for `auto` theme (default: light)
    pub color_scheme: Option<ResolvedTheme>,

    /// Site origin used by `worker precache`
    pub origin: Option<String>,

    /// Directory for the offline asset cache
    pub cache_dir: Option<PathBuf>,

    /// `[notifications]` table
    pub notifications: NotificationConfig,
}

impl CliConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kirzach-live")
            .join("config.toml")
    }

    /// Load config, falling back to defaults.
    ///
    /// A missing file is normal. A malformed file is reported and ignored so
    /// a typo never locks the user out of their settings.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
