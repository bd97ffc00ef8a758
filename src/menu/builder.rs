use super::router::{EventRoute, EventRouter};
use crate::bridge::UiAction;
use anyhow::Result;
use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};

pub const SHOW_ID: &str = "__show__";
pub const QUIT_ID: &str = "__quit__";

pub fn routes() -> Vec<EventRoute> {
    vec![
        EventRoute { id: SHOW_ID.to_string(), action: UiAction::Show },
        EventRoute { id: QUIT_ID.to_string(), action: UiAction::Quit },
    ]
}

pub fn build_menu() -> Result<(Menu, EventRouter)> {
    let menu = Menu::new();
    menu.append(&MenuItem::with_id(SHOW_ID, "Show", true, None))?;
    menu.append(&PredefinedMenuItem::separator())?;
    menu.append(&MenuItem::with_id(QUIT_ID, "Quit", true, None))?;

    Ok((menu, EventRouter::new(routes())))
}
