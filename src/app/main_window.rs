use crate::names::{NameColor, NameSegment};
use crate::poller::{DisplayState, NO_PLAYERS};
use crate::thumbnails::{THUMB_HEIGHT, THUMB_WIDTH};
use eframe::egui::{self, text::LayoutJob, Color32, RichText, TextFormat, TextureHandle};

pub const WINDOW_SIZE: [f32; 2] = [300.0, 560.0];

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 50, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainEvent {
    Connect,
    OpenOptions,
}

fn preview_size() -> egui::Vec2 {
    egui::vec2(THUMB_WIDTH as f32, THUMB_HEIGHT as f32)
}

pub fn name_color(color: NameColor, default: Color32) -> Color32 {
    match color {
        NameColor::Default => default,
        NameColor::Black => Color32::BLACK,
        NameColor::Red => Color32::RED,
        NameColor::Green => Color32::GREEN,
        NameColor::Yellow => Color32::YELLOW,
        NameColor::Blue => Color32::from_rgb(0, 0, 255),
        NameColor::Cyan => Color32::from_rgb(0, 255, 255),
        NameColor::Magenta => Color32::from_rgb(255, 0, 255),
        NameColor::White => Color32::WHITE,
    }
}

fn colored_name(segments: &[NameSegment], default: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for segment in segments {
        job.append(
            &segment.text,
            0.0,
            TextFormat { color: name_color(segment.color, default), ..Default::default() },
        );
    }
    job
}

pub fn draw(ctx: &egui::Context, display: &DisplayState, preview: Option<&TextureHandle>) -> Vec<MainEvent> {
    let mut events = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| preview_area(ui, display, preview));
        ui.add_space(6.0);
        info_grid(ui, display);
        ui.separator();
        roster(ui, display);

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.horizontal(|ui| {
                if ui.button("Connect").clicked() {
                    events.push(MainEvent::Connect);
                }
                if ui.button("Options").clicked() {
                    events.push(MainEvent::OpenOptions);
                }
            });
        });
    });

    events
}

/// The error banner takes the place of the thumbnail.
fn preview_area(ui: &mut egui::Ui, display: &DisplayState, preview: Option<&TextureHandle>) {
    if let Some(error) = &display.error {
        let (rect, _) = ui.allocate_exact_size(preview_size(), egui::Sense::hover());
        ui.painter().rect_filled(rect, 4.0, Color32::from_rgb(60, 20, 20));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            error,
            egui::FontId::proportional(15.0),
            ERROR_COLOR,
        );
        return;
    }

    match preview {
        Some(texture) => {
            ui.add(egui::Image::new(texture).fit_to_exact_size(preview_size()));
        }
        None => {
            ui.allocate_exact_size(preview_size(), egui::Sense::hover());
        }
    }
}

fn info_grid(ui: &mut egui::Ui, display: &DisplayState) {
    let rows = [
        ("Server Name:", display.server_name.clone()),
        ("Map Name:", display.map_name.clone()),
        ("Players:", display.player_count_label()),
        ("Max Players:", display.max_players_label()),
        ("Server IP:", display.ip_label.clone()),
    ];

    egui::Grid::new("server_info").num_columns(2).spacing([8.0, 2.0]).show(ui, |ui| {
        for (label, value) in rows {
            ui.label(RichText::new(label).strong());
            ui.label(value);
            ui.end_row();
        }
    });
}

fn roster(ui: &mut egui::Ui, display: &DisplayState) {
    ui.label(RichText::new("Players").strong());

    if display.roster.is_empty() {
        ui.label(RichText::new(NO_PLAYERS).weak());
        return;
    }

    let default = ui.visuals().text_color();
    egui::ScrollArea::vertical().max_height(170.0).show(ui, |ui| {
        egui::Grid::new("roster").num_columns(2).striped(true).show(ui, |ui| {
            for row in &display.roster {
                ui.label(colored_name(&row.name, default));
                ui.label(RichText::new(&row.time).monospace());
                ui.end_row();
            }
        });
    });
}
