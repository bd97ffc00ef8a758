use super::StartupRegistrar;
use crate::paths::{self, APP_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// XDG autostart entry, e.g. `~/.config/autostart/qlview.desktop`.
pub struct DesktopEntry {
    dir: PathBuf,
}

impl DesktopEntry {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.desktop", APP_NAME.to_lowercase().replace(' ', "-")))
    }

    fn contents(exec: &Path, start_minimized: bool) -> String {
        let mut command = format!("\"{}\"", exec.display());
        if start_minimized {
            command.push_str(" --minimized");
        }
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={}\n\
             Exec={}\n\
             Comment=Quake Live server viewer\n\
             Terminal=false\n\
             Categories=Utility;\n",
            APP_NAME, command
        )
    }

    fn write(&self, exec: &Path, start_minimized: bool) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {:?}", self.dir))?;
        let path = self.path();
        fs::write(&path, Self::contents(exec, start_minimized))
            .with_context(|| format!("writing {:?}", path))?;
        set_executable(&path)?;
        log::info!("Created desktop entry {:?}", path);
        Ok(())
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("setting permissions on {:?}", path))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

impl StartupRegistrar for DesktopEntry {
    fn register(&self, start_minimized: bool) -> Result<()> {
        let exec = paths::executable_path()?;
        self.write(&exec, start_minimized)
    }

    fn unregister(&self) -> Result<bool> {
        let path = self.path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("removing {:?}", path))?;
        log::info!("Removed desktop entry {:?}", path);
        Ok(true)
    }
}
