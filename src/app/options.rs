use crate::poller::DisplayState;
use crate::settings::Settings;
use eframe::egui::{self, Color32, RichText};

pub const OPTIONS_TITLE: &str = "QLView Options";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Info }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: StatusKind::Error }
    }

    fn color(&self) -> Color32 {
        match self.kind {
            StatusKind::Info => Color32::LIGHT_BLUE,
            StatusKind::Success => Color32::from_rgb(80, 180, 80),
            StatusKind::Error => Color32::from_rgb(220, 60, 60),
        }
    }
}

/// What the user asked for this frame. Handled by the app after drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsEvent {
    ToggleStartup(bool),
    SaveAndClose,
    ApplyServer,
    SaveCustomImage,
    Closed,
}

/// Editable copy of the settings plus the inline status of each section.
pub struct OptionsDialog {
    pub show_thumbnail: bool,
    pub start_minimized: bool,
    pub start_with_system: bool,
    pub app_status: Option<Status>,

    pub address: String,
    pub interval: String,
    pub server_status: Option<Status>,

    pub custom_map: String,
    pub custom_url: String,
    pub image_status: Option<Status>,
    pub downloading: bool,
}

impl OptionsDialog {
    pub fn new(settings: &Settings, display: &DisplayState) -> Self {
        let custom_map = if display.has_map() { display.map_name.clone() } else { String::new() };
        Self {
            show_thumbnail: settings.show_thumbnail,
            start_minimized: settings.start_minimized,
            start_with_system: settings.start_with_system,
            app_status: None,
            address: settings.server.to_string(),
            interval: settings.interval_secs.to_string(),
            server_status: None,
            custom_map,
            custom_url: String::new(),
            image_status: None,
            downloading: false,
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> Vec<OptionsEvent> {
        let mut events = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.application_section(ui, &mut events);
            ui.add_space(8.0);
            self.server_section(ui, &mut events);
            ui.add_space(8.0);
            self.custom_image_section(ui, &mut events);
        });

        if ctx.input(|i| i.viewport().close_requested()) {
            events.push(OptionsEvent::Closed);
        }
        events
    }

    fn application_section(&mut self, ui: &mut egui::Ui, events: &mut Vec<OptionsEvent>) {
        ui.group(|ui| {
            ui.label(RichText::new("Application Settings").strong());
            ui.checkbox(&mut self.show_thumbnail, "Show map thumbnail");
            ui.checkbox(&mut self.start_minimized, "Start minimized to tray on next launch");
            if ui.checkbox(&mut self.start_with_system, "Start with system").changed() {
                events.push(OptionsEvent::ToggleStartup(self.start_with_system));
            }
            if ui.button("Save and Close").clicked() {
                events.push(OptionsEvent::SaveAndClose);
            }
            status_label(ui, &self.app_status);
        });
    }

    fn server_section(&mut self, ui: &mut egui::Ui, events: &mut Vec<OptionsEvent>) {
        ui.group(|ui| {
            ui.label(RichText::new("Server Settings").strong());
            egui::Grid::new("server_settings").num_columns(2).show(ui, |ui| {
                ui.label("Server IP:Port:");
                ui.text_edit_singleline(&mut self.address);
                ui.end_row();
                ui.label("Refresh Interval (s):");
                ui.text_edit_singleline(&mut self.interval);
                ui.end_row();
            });
            if ui.button("Apply Live Server Settings").clicked() {
                events.push(OptionsEvent::ApplyServer);
            }
            status_label(ui, &self.server_status);
        });
    }

    fn custom_image_section(&mut self, ui: &mut egui::Ui, events: &mut Vec<OptionsEvent>) {
        ui.group(|ui| {
            ui.label(RichText::new("Custom Map Image").strong());
            egui::Grid::new("custom_image").num_columns(2).show(ui, |ui| {
                ui.label("Map Name:");
                ui.text_edit_singleline(&mut self.custom_map);
                ui.end_row();
                ui.label("Image URL:");
                ui.text_edit_singleline(&mut self.custom_url);
                ui.end_row();
            });
            let button = ui.add_enabled(!self.downloading, egui::Button::new("Save Custom Image"));
            if button.clicked() {
                events.push(OptionsEvent::SaveCustomImage);
            }
            status_label(ui, &self.image_status);
        });
    }
}

fn status_label(ui: &mut egui::Ui, status: &Option<Status>) {
    if let Some(status) = status {
        ui.label(RichText::new(&status.text).color(status.color()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::{CONNECTION_FAILED, LOADING_MAP, NOT_AVAILABLE};

    #[test]
    fn new_copies_settings() {
        let settings = Settings::default();

        let dialog = OptionsDialog::new(&settings, &DisplayState::loading());

        assert_eq!(dialog.address, "108.61.179.235:27962");
        assert_eq!(dialog.interval, "10");
        assert!(dialog.show_thumbnail);
        assert!(!dialog.start_with_system);
        assert!(dialog.app_status.is_none());
    }

    #[test]
    fn custom_map_is_prefilled_unless_placeholder() {
        let cases = [
            ("bloodrun", "bloodrun"),
            (LOADING_MAP, ""),
            (NOT_AVAILABLE, ""),
            (CONNECTION_FAILED, ""),
        ];

        for (map, expected) in cases {
            let mut display = DisplayState::loading();
            display.map_name = map.to_string();

            let dialog = OptionsDialog::new(&Settings::default(), &display);

            assert_eq!(dialog.custom_map, expected, "map: {:?}", map);
        }
    }
}
