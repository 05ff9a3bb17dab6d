//! Top bar UI: app title, status, and overlay load progress.

use super::colors::ui as ui_colors;
use crate::map::{LoadStatus, MapHandle};
use crate::state::AppState;
use crate::tiles::TileCache;
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, map: &MapHandle, tiles: &TileCache) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Earthquakes & Plate Boundaries")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    for entry in map.overlays.iter().rev() {
                        let (text, color) = status_text(entry.group.status());
                        ui.label(RichText::new(text).size(12.0).color(color));
                        ui.label(
                            RichText::new(format!("{}:", entry.group.id().label()))
                                .size(12.0)
                                .color(ui_colors::LABEL),
                        );
                        ui.add_space(8.0);
                    }

                    if state.missing_credential {
                        ui.label(
                            RichText::new("No tile access token: base maps disabled")
                                .size(12.0)
                                .color(ui_colors::PENDING),
                        );
                    } else if tiles.pending_count() > 0 {
                        ui.label(
                            RichText::new(format!(
                                "{} tiles loading, {} cached",
                                tiles.pending_count(),
                                tiles.texture_count()
                            ))
                            .size(12.0)
                            .color(ui_colors::LABEL),
                        );
                    }
                });
            });
        });
}

fn status_text(status: &LoadStatus) -> (String, Color32) {
    match status {
        LoadStatus::Pending => ("loading".to_string(), ui_colors::PENDING),
        LoadStatus::Loaded { count, .. } => (count.to_string(), ui_colors::SUCCESS),
        LoadStatus::Failed(_) => ("failed".to_string(), ui_colors::ERROR),
    }
}
