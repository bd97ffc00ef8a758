mod main_window;
mod options;
mod preview;
mod session;

pub use main_window::WINDOW_SIZE;
pub use options::{OptionsDialog, OptionsEvent, Status, StatusKind};
pub use session::{prepare_custom_image, Redraw, Session, CONNECT_ERROR};

use crate::autostart;
use crate::bridge::{UiAction, UiBridge};
use crate::lifecycle::{self, ShutdownLatch, KEEPALIVE_PERIOD};
use crate::paths::{self, APP_NAME};
use crate::query::A2sClient;
use crate::settings::{Settings, SettingsStore};
use crate::thumbnails::{self, CustomImageError, ThumbnailCache};
use crate::timer::{TimerQueue, TimerToken};
use crate::tray::TrayManager;
use eframe::egui::{self, ViewportBuilder, ViewportCommand, ViewportId};
use main_window::MainEvent;
use preview::PreviewTexture;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

pub const CLOSE_OPTIONS_DELAY: Duration = Duration::from_millis(750);

const OPTIONS_SIZE: [f32; 2] = [400.0, 470.0];

enum UiTimer {
    CloseOptions,
}

/// Everything the app needs from `main`.
pub struct Startup {
    pub settings: Settings,
    pub store: SettingsStore,
    pub thumbnails: ThumbnailCache,
    pub runtime: Handle,
    pub start_hidden: bool,
}

/// App context. Owns all state touched by the UI thread.
pub struct QlviewApp {
    session: Session<A2sClient>,
    preview: PreviewTexture,
    tray: Option<TrayManager>,
    timers: TimerQueue<UiTimer>,
    close_options: Option<TimerToken>,
    actions: Receiver<UiAction>,
    bridge: UiBridge,
    runtime: Handle,
    latch: ShutdownLatch,
    options: Option<OptionsDialog>,
    hide_on_first_frame: bool,
}

impl QlviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        let ctx = cc.egui_ctx.clone();
        let (bridge, actions) = UiBridge::new(move || ctx.request_repaint());

        let mut session = Session::new(
            A2sClient::new(),
            startup.settings,
            startup.store,
            startup.thumbnails,
            autostart::registrar_for_current_platform(),
        );
        session.start(Instant::now());

        let tray = match TrayManager::new(bridge.clone(), &session.display().tray_title()) {
            Ok(tray) => Some(tray),
            Err(e) => {
                log::error!("Failed to create tray icon: {}", e);
                None
            }
        };

        let latch = ShutdownLatch::new();
        let ctx = cc.egui_ctx.clone();
        lifecycle::spawn_keepalive(latch.clone(), KEEPALIVE_PERIOD, move || ctx.request_repaint());
        spawn_ctrl_c_listener(&startup.runtime, bridge.clone());

        let mut preview = PreviewTexture::default();
        preview.set(&cc.egui_ctx, session.idle_preview(), session.placeholder());

        Self {
            session,
            preview,
            tray,
            timers: TimerQueue::new(),
            close_options: None,
            actions,
            bridge,
            runtime: startup.runtime,
            latch,
            options: None,
            hide_on_first_frame: startup.start_hidden,
        }
    }

    fn handle_actions(&mut self, ctx: &egui::Context) {
        while let Ok(action) = self.actions.try_recv() {
            match action {
                UiAction::Show => self.show_window(ctx),
                UiAction::Quit => self.shutdown(ctx),
                UiAction::CustomImageFetched { map_name, result } => {
                    self.finish_custom_image(ctx, &map_name, result)
                }
            }
        }
    }

    fn handle_timers(&mut self, now: Instant) {
        while let Some((token, timer)) = self.timers.pop_due(now) {
            match timer {
                UiTimer::CloseOptions => {
                    if self.close_options == Some(token) {
                        self.close_options = None;
                        self.options = None;
                    }
                }
            }
        }
    }

    fn redraw(&mut self, ctx: &egui::Context, redraw: Redraw) {
        if let Some(preview) = redraw.preview {
            self.preview.set(ctx, preview, self.session.placeholder());
        }
        if redraw.title {
            let display = self.session.display();
            ctx.send_viewport_cmd(ViewportCommand::Title(display.title()));
            let tray_title = display.tray_title();
            if let Some(tray) = &mut self.tray {
                tray.set_tooltip(&tray_title);
            }
        }
    }

    fn show_window(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(ViewportCommand::Minimized(false));
        ctx.send_viewport_cmd(ViewportCommand::Focus);
    }

    /// Parks the window minimized rather than invisible so the UI loop keeps
    /// getting frames for tray actions and poll ticks.
    fn hide_window(&self, ctx: &egui::Context) {
        log::debug!("Hiding window to tray");
        ctx.send_viewport_cmd(ViewportCommand::Minimized(true));
    }

    /// Runs at most once, whichever path asks first.
    fn shutdown(&mut self, ctx: &egui::Context) {
        if !self.latch.trigger() {
            return;
        }
        log::info!("Shutting down {}", APP_NAME);
        self.session.stop();
        self.timers.clear();
        self.close_options = None;
        self.options = None;
        if let Some(tray) = self.tray.take() {
            tray.stop();
        }
        ctx.send_viewport_cmd(ViewportCommand::Close);
    }

    fn open_options(&mut self, ctx: &egui::Context) {
        if self.options.is_some() {
            ctx.send_viewport_cmd_to(options_viewport(), ViewportCommand::Focus);
            return;
        }
        self.options = Some(self.session.options_dialog());
    }

    fn handle_options_event(&mut self, ctx: &egui::Context, event: OptionsEvent) {
        if let OptionsEvent::Closed = event {
            self.options = None;
            if let Some(token) = self.close_options.take() {
                self.timers.cancel(token);
            }
            return;
        }

        let Some(dialog) = &mut self.options else { return };
        match event {
            OptionsEvent::ToggleStartup(enable) => self.session.toggle_startup(dialog, enable),
            OptionsEvent::SaveAndClose => {
                let redraw = self.session.save_options(dialog);
                self.redraw(ctx, redraw);
                self.schedule_close_options();
            }
            OptionsEvent::ApplyServer => {
                let redraw = self.session.apply_server(dialog, Instant::now());
                self.redraw(ctx, redraw);
            }
            OptionsEvent::SaveCustomImage => {
                if let Some((map_name, url)) = prepare_custom_image(dialog) {
                    self.spawn_custom_image(map_name, url);
                }
            }
            OptionsEvent::Closed => {}
        }
    }

    fn schedule_close_options(&mut self) {
        if let Some(token) = self.close_options.take() {
            self.timers.cancel(token);
        }
        let token = self.timers.schedule(Instant::now(), CLOSE_OPTIONS_DELAY, UiTimer::CloseOptions);
        self.close_options = Some(token);
    }

    fn spawn_custom_image(&self, map_name: String, url: String) {
        log::info!("Fetching custom image for {} from {}", map_name, url);
        let bridge = self.bridge.clone();
        self.runtime.spawn(async move {
            let result = thumbnails::fetch(&url).await;
            bridge.send(UiAction::CustomImageFetched { map_name, result });
        });
    }

    fn finish_custom_image(
        &mut self,
        ctx: &egui::Context,
        map_name: &str,
        result: Result<Vec<u8>, CustomImageError>,
    ) {
        let redraw = self.session.finish_custom_image(self.options.as_mut(), map_name, result);
        self.redraw(ctx, redraw);
    }

    fn draw_options(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.options else { return };

        let events = ctx.show_viewport_immediate(
            options_viewport(),
            ViewportBuilder::default()
                .with_title(options::OPTIONS_TITLE)
                .with_inner_size(OPTIONS_SIZE)
                .with_resizable(false),
            |ctx, _class| dialog.ui(ctx),
        );

        for event in events {
            self.handle_options_event(ctx, event);
        }
    }

    fn next_wakeup(&self, now: Instant) -> Duration {
        [self.session.time_until_next(now), self.timers.time_until_next(now)]
            .into_iter()
            .flatten()
            .fold(KEEPALIVE_PERIOD, Duration::min)
    }
}

fn options_viewport() -> ViewportId {
    ViewportId::from_hash_of("qlview_options")
}

fn spawn_ctrl_c_listener(runtime: &Handle, bridge: UiBridge) {
    runtime.spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Ctrl-C received");
                bridge.send(UiAction::Quit);
            }
            Err(e) => log::warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}

impl eframe::App for QlviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.hide_on_first_frame {
            self.hide_on_first_frame = false;
            self.hide_window(ctx);
        }

        self.handle_actions(ctx);
        if self.latch.is_triggered() {
            return;
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.shutdown(ctx);
            return;
        }

        let now = Instant::now();
        self.handle_timers(now);
        if let Some(redraw) = self.session.tick(now) {
            self.redraw(ctx, redraw);
        }

        for event in main_window::draw(ctx, self.session.display(), self.preview.texture()) {
            match event {
                MainEvent::Connect => self.session.connect(paths::open_url),
                MainEvent::OpenOptions => self.open_options(ctx),
            }
        }
        self.draw_options(ctx);

        ctx.request_repaint_after(self.next_wakeup(Instant::now()));
    }
}
