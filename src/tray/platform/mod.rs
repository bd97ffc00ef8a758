#[cfg(target_os = "linux")]
mod linux;

#[cfg(not(target_os = "linux"))]
mod standard;

use crate::bridge::UiBridge;
use anyhow::Result;
use tray_icon::Icon;

#[cfg(target_os = "linux")]
use std::sync::mpsc::Sender;
#[cfg(not(target_os = "linux"))]
use tray_icon::TrayIcon;

pub enum PlatformTray {
    #[cfg(target_os = "linux")]
    Linux(Sender<linux::TrayCommand>),
    #[cfg(not(target_os = "linux"))]
    Standard(TrayIcon),
}

#[cfg(target_os = "linux")]
pub fn create_tray(bridge: UiBridge, icon: Icon, tooltip: &str) -> Result<PlatformTray> {
    let commands = linux::create_tray(bridge, icon, tooltip.to_string())?;
    Ok(PlatformTray::Linux(commands))
}

#[cfg(not(target_os = "linux"))]
pub fn create_tray(bridge: UiBridge, icon: Icon, tooltip: &str) -> Result<PlatformTray> {
    let (menu, router) = crate::menu::builder::build_menu()?;
    let tray = standard::create_tray(menu, router, bridge, icon, tooltip)?;
    Ok(PlatformTray::Standard(tray))
}

impl PlatformTray {
    pub fn set_tooltip(&self, text: &str) {
        match self {
            #[cfg(target_os = "linux")]
            PlatformTray::Linux(commands) => {
                let _ = commands.send(linux::TrayCommand::SetTooltip(text.to_string()));
            }
            #[cfg(not(target_os = "linux"))]
            PlatformTray::Standard(tray) => {
                if let Err(e) = tray.set_tooltip(Some(text)) {
                    log::warn!("Failed to update tray tooltip: {}", e);
                }
            }
        }
    }

    pub fn stop(&self) {
        match self {
            #[cfg(target_os = "linux")]
            PlatformTray::Linux(commands) => {
                let _ = commands.send(linux::TrayCommand::Stop);
            }
            #[cfg(not(target_os = "linux"))]
            PlatformTray::Standard(tray) => {
                if let Err(e) = tray.set_visible(false) {
                    log::warn!("Failed to hide tray icon: {}", e);
                }
            }
        }
    }
}
