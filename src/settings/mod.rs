mod address;

pub use address::{AddressError, ServerAddress};

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "108.61.179.235";
pub const DEFAULT_PORT: u16 = 27962;
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerAddress,
    pub interval_secs: u64,
    pub show_thumbnail: bool,
    pub start_minimized: bool,
    pub start_with_system: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerAddress::new(DEFAULT_HOST, DEFAULT_PORT),
            interval_secs: DEFAULT_INTERVAL_SECS,
            show_thumbnail: true,
            start_minimized: false,
            start_with_system: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("Invalid interval value.")]
    InvalidInterval,
    #[error("Interval must be >= 1 second.")]
    IntervalTooSmall,
}

pub fn parse_interval(text: &str) -> Result<u64, SettingsError> {
    let value: i64 = text.trim().parse().map_err(|_| SettingsError::InvalidInterval)?;
    if value < 1 {
        return Err(SettingsError::IntervalTooSmall);
    }
    Ok(value as u64)
}

/// Validates the text fields of the server settings form.
pub fn parse_server_settings(
    address: &str,
    interval: &str,
) -> Result<(ServerAddress, u64), SettingsError> {
    let server = address.parse::<ServerAddress>()?;
    let interval_secs = parse_interval(interval)?;
    Ok((server, interval_secs))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct SettingsSection {
    server: String,
    interval: i64,
    thumbnail: bool,
    start_minimized: bool,
    start_with_system: bool,
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for SettingsSection {
    fn from(settings: &Settings) -> Self {
        Self {
            server: settings.server.to_string(),
            interval: settings.interval_secs as i64,
            thumbnail: settings.show_thumbnail,
            start_minimized: settings.start_minimized,
            start_with_system: settings.start_with_system,
        }
    }
}

impl TryFrom<SettingsSection> for Settings {
    type Error = SettingsError;

    fn try_from(section: SettingsSection) -> Result<Self, Self::Error> {
        let server = section.server.parse::<ServerAddress>()?;
        if section.interval < 1 {
            return Err(SettingsError::IntervalTooSmall);
        }

        Ok(Self {
            server,
            interval_secs: section.interval as u64,
            show_thumbnail: section.thumbnail,
            start_minimized: section.start_minimized,
            start_with_system: section.start_with_system,
        })
    }
}

pub struct SettingsStore {
    config_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self> {
        let config_path = paths::config_path()?;
        Ok(Self { config_path })
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads settings, falling back to defaults (and rewriting the file) when
    /// it is missing or cannot be parsed.
    pub fn load(&self) -> Settings {
        if !self.config_path.exists() {
            log::info!("No config at {:?}, writing defaults", self.config_path);
            return self.reset_to_defaults();
        }

        match self.read() {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Error reading config file {:?}: {:#}. Using default settings.",
                    self.config_path,
                    e
                );
                self.reset_to_defaults()
            }
        }
    }

    fn read(&self) -> Result<Settings> {
        let content = std::fs::read_to_string(&self.config_path)?;
        let file: ConfigFile = toml::from_str(&content)?;
        let settings = Settings::try_from(file.settings)?;
        Ok(settings)
    }

    fn reset_to_defaults(&self) -> Settings {
        let settings = Settings::default();
        if let Err(e) = self.save(&settings) {
            log::error!("Could not write config file {:?}: {:#}", self.config_path, e);
        }
        settings
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        ensure_parent_dir(&self.config_path)?;
        let file = ConfigFile {
            settings: SettingsSection::from(settings),
        };
        let content = toml::to_string(&file).context("Failed to serialize settings")?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {:?}", self.config_path))?;
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
