//! Configuration for the teaser page.
//!
//! Settings are read from `config.toml` in the platform config directory.
//! Every field is optional; link targets and the status line can also be
//! overridden from the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use teaser_core::SchemePreference;
use thiserror::Error;

/// Environment variable overriding the X profile link.
pub const ENV_X_URL: &str = "TEASER_X_URL";
/// Environment variable overriding the Telegram link.
pub const ENV_TELEGRAM_URL: &str = "TEASER_TELEGRAM_URL";
/// Environment variable overriding the Discord invite.
pub const ENV_DISCORD_URL: &str = "TEASER_DISCORD_URL";
/// Environment variable overriding the documentation link.
pub const ENV_DOCS_URL: &str = "TEASER_DOCS_URL";
/// Environment variable overriding the footer status text.
pub const ENV_STATUS_TEXT: &str = "TEASER_STATUS_TEXT";

const CONFIG_FILE: &str = "config.toml";
const MAX_FRAME_RATE: u32 = 120;

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Particle background settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub particle_count: usize,
    /// Fixed particle color; `None` picks a contrasting one.
    pub particle_color: Option<String>,
    /// Solid color behind the particles; `None` or `transparent` shows the terminal.
    pub background_color: Option<String>,
    /// Surface oversampling factor, clamped to [1, 2] when used.
    pub pixel_ratio: f32,
    /// Animation frames per second, clamped to 1..=120 when used.
    pub frame_rate: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            particle_count: 450,
            particle_color: Some("rgba(175, 127, 35, 0.8)".to_string()),
            background_color: Some("#000".to_string()),
            pixel_ratio: 1.0,
            frame_rate: 60,
        }
    }
}

/// Page styling the background can detect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page background color, empty when unset.
    pub background: String,
}

/// Outbound link targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub x: String,
    pub telegram: String,
    pub discord: String,
    pub docs: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            x: "https://x.com/".to_string(),
            telegram: "https://t.me/".to_string(),
            discord: "https://discord.gg/T7Sp6nSM".to_string(),
            docs: "https://docs.memebattles.gg".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred color scheme.
    pub scheme: SchemePreference,
    /// Footer status text, hidden when empty.
    pub status: String,
    pub background: BackgroundConfig,
    pub page: PageConfig,
    pub links: LinksConfig,
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("gg", "memebattles", "teaser")
    }

    /// Path of the config file, if the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Directory for runtime data such as the log file.
    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml(&contents)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize to a TOML document.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Write to `path`, creating its parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get(ENV_X_URL) {
            self.links.x = v;
        }
        if let Some(v) = get(ENV_TELEGRAM_URL) {
            self.links.telegram = v;
        }
        if let Some(v) = get(ENV_DISCORD_URL) {
            self.links.discord = v;
        }
        if let Some(v) = get(ENV_DOCS_URL) {
            self.links.docs = v;
        }
        if let Some(v) = get(ENV_STATUS_TEXT) {
            self.status = v;
        }
        self
    }

    /// Time between animation frames.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.background.frame_rate.clamp(1, MAX_FRAME_RATE);
        Duration::from_secs_f64(1.0 / fps as f64)
    }
}
