pub mod icon;
pub mod platform;

use crate::bridge::UiBridge;
use anyhow::Result;

pub struct TrayManager {
    tray: platform::PlatformTray,
    tooltip: String,
}

impl TrayManager {
    pub fn new(bridge: UiBridge, tooltip: &str) -> Result<Self> {
        let icon = icon::create_icon()?;
        let tray = platform::create_tray(bridge, icon, tooltip)?;
        Ok(Self { tray, tooltip: tooltip.to_string() })
    }

    pub fn set_tooltip(&mut self, text: &str) {
        if self.tooltip == text {
            return;
        }
        self.tooltip = text.to_string();
        self.tray.set_tooltip(text);
    }

    pub fn stop(&self) {
        self.tray.stop();
    }
}
