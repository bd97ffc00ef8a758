use super::options::{OptionsDialog, Status};
use crate::autostart::{self, StartupRegistrar};
use crate::poller::{ApplyOutcome, DisplayState, PollTarget, Poller, ThumbnailRequest};
use crate::query::QueryClient;
use crate::settings::{self, Settings, SettingsStore};
use crate::thumbnails::{CustomImageError, Preview, ThumbnailCache};
use anyhow::Result;
use image::RgbaImage;
use std::time::{Duration, Instant};

pub const CONNECT_ERROR: &str = "Error: Could not open Steam link.";

/// What the window has to refresh after a session change.
#[derive(Debug, Default, PartialEq)]
pub struct Redraw {
    /// Window title and tray tooltip.
    pub title: bool,
    pub preview: Option<Preview>,
}

/// Everything the app does that does not need a window: settings, the
/// poller, the thumbnail cache and startup registration.
pub struct Session<C> {
    settings: Settings,
    store: SettingsStore,
    poller: Poller<C>,
    thumbnails: ThumbnailCache,
    registrar: Box<dyn StartupRegistrar>,
}

impl<C: QueryClient> Session<C> {
    pub fn new(
        client: C,
        settings: Settings,
        store: SettingsStore,
        thumbnails: ThumbnailCache,
        registrar: Box<dyn StartupRegistrar>,
    ) -> Self {
        let poller = Poller::new(client, PollTarget::from(&settings));
        Self { settings, store, poller, thumbnails, registrar }
    }

    pub fn start(&mut self, now: Instant) {
        self.poller.start(now);
    }

    pub fn stop(&mut self) {
        self.poller.stop();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn display(&self) -> &DisplayState {
        self.poller.display()
    }

    pub fn placeholder(&self) -> &RgbaImage {
        self.thumbnails.placeholder()
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.poller.time_until_next(now)
    }

    pub fn idle_preview(&self) -> Preview {
        self.thumbnails.idle(self.settings.show_thumbnail)
    }

    /// Runs the poll cycle if its tick is due.
    pub fn tick(&mut self, now: Instant) -> Option<Redraw> {
        let report = self.poller.poll(now)?;
        Some(Redraw {
            title: report.title_changed,
            preview: report.thumbnail.map(|request| self.resolve(request)),
        })
    }

    fn resolve(&self, request: ThumbnailRequest) -> Preview {
        match request {
            ThumbnailRequest::Resolve(map) => self.thumbnails.resolve(&map, self.settings.show_thumbnail),
            ThumbnailRequest::Clear => Preview::Blank,
        }
    }

    /// Hands the Steam connect link to `open`. A failure shows up in the
    /// error banner until the next successful poll.
    pub fn connect(&mut self, open: impl FnOnce(&str) -> Result<()>) {
        let url = self.settings.server.connect_url();
        log::info!("Opening {}", url);
        if let Err(e) = open(&url) {
            log::error!("Failed to open {}: {:#}", url, e);
            self.poller.display_mut().error = Some(CONNECT_ERROR.to_string());
        }
    }

    pub fn options_dialog(&self) -> OptionsDialog {
        OptionsDialog::new(&self.settings, self.poller.display())
    }

    pub fn toggle_startup(&mut self, dialog: &mut OptionsDialog, enable: bool) {
        let result = autostart::toggle(self.registrar.as_ref(), enable, dialog.start_minimized);
        dialog.start_with_system = result.enabled;
        dialog.app_status = Some(if result.enabled == enable {
            Status::success(result.status)
        } else {
            Status::error(result.status)
        });
        self.settings.start_with_system = result.enabled;
        self.persist();
    }

    /// Stores the application section of the dialog.
    pub fn save_options(&mut self, dialog: &mut OptionsDialog) -> Redraw {
        let thumbnails_changed = self.settings.show_thumbnail != dialog.show_thumbnail;
        self.settings.show_thumbnail = dialog.show_thumbnail;
        self.settings.start_minimized = dialog.start_minimized;
        self.settings.start_with_system = dialog.start_with_system;
        dialog.app_status = Some(Status::success("Settings saved."));
        self.persist();

        self.poller.set_show_thumbnail(self.settings.show_thumbnail);
        let preview = (thumbnails_changed && !self.poller.display().has_shown_data())
            .then(|| self.idle_preview());
        Redraw { title: false, preview }
    }

    /// Validates the server section and switches the poller over.
    pub fn apply_server(&mut self, dialog: &mut OptionsDialog, now: Instant) -> Redraw {
        let (server, interval_secs) = match settings::parse_server_settings(&dialog.address, &dialog.interval) {
            Ok(parsed) => parsed,
            Err(e) => {
                dialog.server_status = Some(Status::error(e.to_string()));
                return Redraw::default();
            }
        };

        let mut next = self.settings.clone();
        next.server = server;
        next.interval_secs = interval_secs;

        let outcome = self.poller.apply(PollTarget::from(&next), now);
        dialog.server_status = Some(Status::success(outcome.status()));
        if outcome == ApplyOutcome::Unchanged {
            return Redraw::default();
        }

        self.settings = next;
        self.persist();
        Redraw { title: true, preview: Some(self.idle_preview()) }
    }

    /// Stores a downloaded custom image. When it belongs to the map on
    /// screen the preview is resolved again, now and on the next cycle.
    pub fn finish_custom_image(
        &mut self,
        dialog: Option<&mut OptionsDialog>,
        map_name: &str,
        result: Result<Vec<u8>, CustomImageError>,
    ) -> Redraw {
        let saved = result.and_then(|bytes| self.thumbnails.save_custom(map_name, &bytes));
        let shown = saved.is_ok() && self.poller.display().map_name == map_name;

        if let Some(dialog) = dialog {
            dialog.downloading = false;
            dialog.image_status = Some(match &saved {
                Ok(path) => {
                    let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
                    let mut text = format!("Image for '{}' saved as\n'{}'.", map_name, file);
                    if shown {
                        text.push_str("\nPreview will update shortly.");
                    }
                    Status::success(text)
                }
                Err(e) => Status::error(e.to_string()),
            });
        }

        if !shown {
            return Redraw::default();
        }
        self.poller.invalidate_thumbnail();
        let preview = self
            .settings
            .show_thumbnail
            .then(|| self.resolve(ThumbnailRequest::Resolve(map_name.to_string())));
        Redraw { title: false, preview }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.settings) {
            log::error!("Failed to save settings: {:#}", e);
        }
    }
}

/// Checks the custom image section. Returns the trimmed map name and URL
/// to download, or leaves an error in the dialog.
pub fn prepare_custom_image(dialog: &mut OptionsDialog) -> Option<(String, String)> {
    let map_name = dialog.custom_map.trim().to_string();
    let url = dialog.custom_url.trim().to_string();

    let missing = if map_name.is_empty() {
        Some(CustomImageError::EmptyMap)
    } else if url.is_empty() {
        Some(CustomImageError::EmptyUrl)
    } else {
        None
    };
    if let Some(e) = missing {
        dialog.image_status = Some(Status::error(e.to_string()));
        return None;
    }

    dialog.downloading = true;
    dialog.image_status = Some(Status::info(format!("Downloading for '{}'...", map_name)));
    Some((map_name, url))
}
