use anyhow::{anyhow, Result};
use eframe::egui;
use qlview::app::{QlviewApp, Startup, WINDOW_SIZE};
use qlview::paths::{self, APP_NAME};
use qlview::settings::SettingsStore;
use qlview::thumbnails::ThumbnailCache;
use qlview::tray::icon::{icon_rgba, ICON_SIZE};

const MINIMIZED_FLAG: &str = "--minimized";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {}...", APP_NAME);

    let store = SettingsStore::new()?;
    let settings = store.load();
    log::info!("Settings loaded from {:?}", store.path());

    let thumbnails = ThumbnailCache::new(paths::mapshots_dir()?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let start_hidden = settings.start_minimized || std::env::args().any(|a| a == MINIMIZED_FLAG);
    if start_hidden {
        log::info!("Starting minimized to tray");
    }

    let startup = Startup {
        settings,
        store,
        thumbnails,
        runtime: runtime.handle().clone(),
        start_hidden,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(false)
            .with_icon(egui::IconData {
                rgba: icon_rgba(),
                width: ICON_SIZE,
                height: ICON_SIZE,
            }),
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| Ok(Box::new(QlviewApp::new(cc, startup)))),
    )
    .map_err(|e| anyhow!("Window failed: {}", e))?;

    runtime.shutdown_background();
    log::info!("{} exited", APP_NAME);
    Ok(())
}
