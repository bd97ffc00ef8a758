#[cfg(any(target_os = "linux", test))]
mod desktop_entry;
#[cfg(target_os = "windows")]
mod run_entry;

#[cfg(any(target_os = "linux", test))]
pub use desktop_entry::DesktopEntry;
#[cfg(target_os = "windows")]
pub use run_entry::RunEntry;

use crate::paths::APP_NAME;
use anyhow::{bail, Result};

pub const MACOS_HINT: &str = "macOS: Add to Login Items via System Settings.";
pub const UNSUPPORTED_HINT: &str = "OS not supported for automatic startup.";

/// Adds or removes the artifact that launches the app at login.
pub trait StartupRegistrar {
    /// Set when this platform cannot register automatically. The text tells
    /// the user what to do instead.
    fn manual_hint(&self) -> Option<&'static str> {
        None
    }

    fn register(&self, start_minimized: bool) -> Result<()>;

    /// Returns `false` when nothing was registered.
    fn unregister(&self) -> Result<bool>;
}

/// Platforms where the user has to register the app themselves.
pub struct Manual {
    hint: &'static str,
}

impl Manual {
    pub fn macos() -> Self {
        Self { hint: MACOS_HINT }
    }

    pub fn unsupported() -> Self {
        Self { hint: UNSUPPORTED_HINT }
    }
}

impl StartupRegistrar for Manual {
    fn manual_hint(&self) -> Option<&'static str> {
        Some(self.hint)
    }

    fn register(&self, _start_minimized: bool) -> Result<()> {
        bail!("{}", self.hint)
    }

    fn unregister(&self) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(target_os = "linux")]
pub fn registrar_for_current_platform() -> Box<dyn StartupRegistrar> {
    match crate::paths::autostart_dir() {
        Ok(dir) => Box::new(DesktopEntry::new(dir)),
        Err(e) => {
            log::warn!("Autostart unavailable: {}", e);
            Box::new(Manual::unsupported())
        }
    }
}

#[cfg(target_os = "windows")]
pub fn registrar_for_current_platform() -> Box<dyn StartupRegistrar> {
    Box::new(RunEntry)
}

#[cfg(target_os = "macos")]
pub fn registrar_for_current_platform() -> Box<dyn StartupRegistrar> {
    Box::new(Manual::macos())
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
pub fn registrar_for_current_platform() -> Box<dyn StartupRegistrar> {
    Box::new(Manual::unsupported())
}

/// Result of flipping the "Start with system" toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// Value the toggle should show afterwards. Failures revert it.
    pub enabled: bool,
    pub status: String,
}

pub fn toggle(registrar: &dyn StartupRegistrar, enable: bool, start_minimized: bool) -> Toggle {
    if let Some(hint) = registrar.manual_hint() {
        log::info!("{}", hint);
        return Toggle { enabled: false, status: hint.to_string() };
    }

    if enable {
        return match registrar.register(start_minimized) {
            Ok(()) => {
                log::info!("Registered {} for startup", APP_NAME);
                Toggle { enabled: true, status: format!("{} added to startup.", APP_NAME) }
            }
            Err(e) => {
                log::error!("Failed to register startup entry: {:#}", e);
                Toggle { enabled: false, status: format!("Error adding to startup: {:#}", e) }
            }
        };
    }

    match registrar.unregister() {
        Ok(true) => Toggle { enabled: false, status: format!("{} removed from startup.", APP_NAME) },
        Ok(false) => Toggle { enabled: false, status: format!("{} was not in startup.", APP_NAME) },
        Err(e) => {
            log::error!("Failed to remove startup entry: {:#}", e);
            Toggle { enabled: true, status: format!("Error removing from startup: {:#}", e) }
        }
    }
}
