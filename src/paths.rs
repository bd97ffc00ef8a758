use anyhow::{Context, Result};
use std::path::PathBuf;

pub const APP_NAME: &str = "QLView";

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("qlview"))
}

pub fn config_path() -> Result<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

pub fn mapshots_dir() -> Result<PathBuf> {
    config_dir().map(|p| p.join("Mapshots"))
}

pub fn autostart_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("autostart"))
}

pub fn executable_path() -> Result<PathBuf> {
    std::env::current_exe().context("Could not determine executable path")
}

pub fn open_url(url: &str) -> Result<()> {
    open::that(url)?;
    Ok(())
}
