use crate::bridge::UiBridge;
use crate::menu::router::{EventRouter, HandlerResult};
use anyhow::Result;
use gtk::{self, glib};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tray_icon::menu::{MenuEvent, MenuEventReceiver};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Messages from the UI thread to the GTK thread owning the icon.
pub enum TrayCommand {
    SetTooltip(String),
    Stop,
}

/// Spawns the GTK thread that owns the tray icon. Returns the channel used to
/// update or stop it.
pub fn create_tray(bridge: UiBridge, icon: Icon, tooltip: String) -> Result<Sender<TrayCommand>> {
    let (tx, rx) = mpsc::channel();

    std::thread::Builder::new()
        .name("tray".into())
        .spawn(move || {
            if gtk::init().is_err() {
                log::error!("Failed to initialize GTK");
                return;
            }

            let (menu, router) = match crate::menu::builder::build_menu() {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Failed to build menu: {}", e);
                    return;
                }
            };

            let tray_icon = TrayIconBuilder::new()
                .with_menu(Box::new(menu))
                .with_tooltip(&tooltip)
                .with_icon(icon)
                .build();

            let tray_icon = match tray_icon {
                Ok(icon) => icon,
                Err(e) => {
                    log::error!("Failed to create tray icon: {}", e);
                    return;
                }
            };

            setup_event_loop(tray_icon, router, bridge, rx);
            gtk::main();
            log::debug!("Tray thread finished");
        })?;

    Ok(tx)
}

fn setup_event_loop(tray_icon: TrayIcon, router: EventRouter, bridge: UiBridge, commands: Receiver<TrayCommand>) {
    let menu_receiver = MenuEvent::receiver();

    glib::timeout_add_local(POLL_INTERVAL, move || {
        if !process_commands(&tray_icon, &commands) {
            gtk::main_quit();
            return glib::ControlFlow::Break;
        }
        process_menu_events(menu_receiver, &router, &bridge)
    });
}

/// Returns `false` once the icon should go away.
fn process_commands(tray_icon: &TrayIcon, commands: &Receiver<TrayCommand>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(TrayCommand::SetTooltip(text)) => {
                if let Err(e) = tray_icon.set_tooltip(Some(text)) {
                    log::warn!("Failed to update tray tooltip: {}", e);
                }
            }
            Ok(TrayCommand::Stop) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}

fn process_menu_events(
    receiver: &MenuEventReceiver,
    router: &EventRouter,
    bridge: &UiBridge,
) -> glib::ControlFlow {
    while let Ok(event) = receiver.try_recv() {
        log::debug!("Menu event: {}", event.id.0);
        if let HandlerResult::Quit = router.route(&event.id.0, bridge) {
            // The UI answers with TrayCommand::Stop during shutdown.
            break;
        }
    }
    glib::ControlFlow::Continue
}
