use crate::bridge::UiBridge;
use crate::menu::router::{EventRouter, HandlerResult};
use anyhow::Result;
use tray_icon::{menu::{Menu, MenuEvent}, Icon, TrayIcon, TrayIconBuilder};

/// Builds the icon on the calling (UI) thread; menu clicks are forwarded from
/// a dedicated thread.
pub fn create_tray(
    menu: Menu,
    router: EventRouter,
    bridge: UiBridge,
    icon: Icon,
    tooltip: &str,
) -> Result<TrayIcon> {
    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(tooltip)
        .with_icon(icon)
        .build()?;

    spawn_event_loop(router, bridge);

    Ok(tray_icon)
}

fn spawn_event_loop(router: EventRouter, bridge: UiBridge) {
    let menu_receiver = MenuEvent::receiver();

    std::thread::spawn(move || {
        while let Ok(event) = menu_receiver.recv() {
            log::debug!("Menu event: {}", event.id.0);
            if let HandlerResult::Quit = router.route(&event.id.0, &bridge) {
                break;
            }
        }
    });
}
