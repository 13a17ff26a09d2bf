//! Configuration settings for usher.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::directory::Location;
use crate::error::{ConfigError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub preference: PreferenceConfig,
    pub cache: CacheConfig,
    pub free_busy: FreeBusyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("usher.toml"),
            dirs::config_dir()
                .map(|p| p.join("usher/config.toml"))
                .unwrap_or_default(),
        ];
        for path in &config_paths {
            if path.exists() {
                tracing::info!("loading config from {}", path.display());
                return Self::from_file(path);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        if self.run.look_ahead_hours == 0 {
            return Err(ConfigError::Invalid("look_ahead_hours must be > 0".to_string()).into());
        }
        if self.free_busy.chunk_size == 0 {
            return Err(
                ConfigError::Invalid("free_busy.chunk_size must be > 0".to_string()).into(),
            );
        }
        if self.preference.floor.is_some() != self.preference.section.is_some() {
            return Err(ConfigError::Invalid(
                "preference.floor and preference.section must be set together".to_string(),
            )
            .into());
        }
        Ok(())
    }

    /// The configured cache directory, tilde-expanded, if any.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache
            .dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).as_ref()))
    }

    /// The preferred floor/section fallback anchor, if configured.
    pub fn preferred_location(&self) -> Option<Location> {
        match (self.preference.floor, self.preference.section) {
            (Some(floor), Some(section)) => Some(Location { floor, section }),
            _ => None,
        }
    }
}

/// Settings for one assignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Calendar to operate on.
    pub calendar_id: String,
    /// How far ahead to process events.
    pub look_ahead_hours: u64,
    /// Free-text query resolving the building to book rooms in.
    pub building: String,
    /// Plan only; perform no calendar writes.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            calendar_id: "primary".to_string(),
            look_ahead_hours: 24,
            building: String::new(),
            dry_run: false,
        }
    }
}

/// Fallback floor/section used when no neighboring booking anchors an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    pub floor: Option<i32>,
    pub section: Option<i32>,
}

/// Disk cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory override; defaults to the user cache dir.
    pub dir: Option<String>,
    /// Catalog entries older than this are refetched.
    pub max_age_days: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_age_days: 7,
        }
    }
}

/// Free/busy lookup tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeBusyConfig {
    /// Calendars per upstream free/busy call. The service rejects larger
    /// requests well before its documented limit; 20 is known to work.
    pub chunk_size: usize,
}

impl Default for FreeBusyConfig {
    fn default() -> Self {
        Self { chunk_size: 20 }
    }
}
