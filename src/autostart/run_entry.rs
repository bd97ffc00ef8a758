use super::StartupRegistrar;
use crate::paths::{self, APP_NAME};
use anyhow::{Context, Result};
use auto_launch::{AutoLaunch, AutoLaunchBuilder};

/// `HKCU\...\CurrentVersion\Run` value named after the app.
pub struct RunEntry;

impl RunEntry {
    fn launcher(start_minimized: bool) -> Result<AutoLaunch> {
        let exe = paths::executable_path()?;
        let exe = exe.to_str().context("Executable path is not valid UTF-8")?;
        let args: &[&str] = if start_minimized { &["--minimized"] } else { &[] };

        AutoLaunchBuilder::new()
            .set_app_name(APP_NAME)
            .set_app_path(exe)
            .set_args(args)
            .build()
            .context("Failed to prepare startup entry")
    }
}

impl StartupRegistrar for RunEntry {
    fn register(&self, start_minimized: bool) -> Result<()> {
        Self::launcher(start_minimized)?
            .enable()
            .context("Failed to write startup entry")
    }

    fn unregister(&self) -> Result<bool> {
        let launcher = Self::launcher(false)?;
        if !launcher.is_enabled().context("Failed to read startup entry")? {
            return Ok(false);
        }
        launcher.disable().context("Failed to delete startup entry")?;
        Ok(true)
    }
}
