//! Magnitude legend anchored to the bottom-right of the map.

use super::colors::map as map_colors;
use crate::map::MapHandle;
use eframe::egui::{self, RichText, Sense, Stroke, Vec2};

const SWATCH_SIZE: f32 = 16.0;

pub fn render_legend(ctx: &egui::Context, map: &MapHandle) {
    egui::Area::new(egui::Id::new("magnitude_legend"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(map_colors::CONTROL_FILL)
                .show(ui, |ui| {
                    ui.spacing_mut().item_spacing.y = 2.0;
                    for entry in map.legend() {
                        ui.horizontal(|ui| {
                            let (rect, _) =
                                ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
                            let painter = ui.painter();
                            painter.rect_filled(rect, 0.0, entry.color.to_color32());
                            painter.rect_stroke(
                                rect,
                                0.0,
                                Stroke::new(0.5, map_colors::SWATCH_BORDER),
                                egui::StrokeKind::Inside,
                            );
                            ui.label(
                                RichText::new(&entry.label)
                                    .monospace()
                                    .color(map_colors::CONTROL_TEXT),
                            )
                            .on_hover_text(entry.color.hex());
                        });
                    }
                });
        });
}
