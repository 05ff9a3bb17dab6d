//! Layer control: base layer radios and overlay checkboxes.

use super::colors::{map as map_colors, ui as ui_colors};
use crate::map::{LoadStatus, MapHandle, OverlayId};
use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

/// Clearance below the top bar.
const TOP_OFFSET: f32 = 46.0;

pub fn render_layer_control(ctx: &egui::Context, map: &mut MapHandle) {
    egui::Area::new(egui::Id::new("layer_control"))
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, TOP_OFFSET])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(map_colors::CONTROL_FILL)
                .show(ui, |ui| {
                    if map.layer_control.collapsed {
                        egui::CollapsingHeader::new(
                            RichText::new(format!("{} Layers", icons::STACK))
                                .color(map_colors::CONTROL_TEXT),
                        )
                        .default_open(false)
                        .show(ui, |ui| render_layer_lists(ui, map));
                    } else {
                        render_layer_lists(ui, map);
                    }
                });
        });
}

fn render_layer_lists(ui: &mut egui::Ui, map: &mut MapHandle) {
    ui.label(
        RichText::new(format!("{} Base map", icons::MAP_TRIFOLD))
            .strong()
            .color(map_colors::CONTROL_TEXT),
    );

    let mut selected = map.active_base();
    for layer in map.base_layers() {
        ui.radio_value(
            &mut selected,
            layer.kind,
            RichText::new(layer.label()).color(map_colors::CONTROL_TEXT),
        );
    }
    map.select_base(selected);

    ui.separator();
    ui.label(
        RichText::new(format!("{} Overlays", icons::STACK))
            .strong()
            .color(map_colors::CONTROL_TEXT),
    );

    for id in OverlayId::ALL {
        let mut enabled = map.overlays.is_enabled(id);
        ui.horizontal(|ui| {
            ui.checkbox(
                &mut enabled,
                RichText::new(id.label()).color(map_colors::CONTROL_TEXT),
            );
            render_status_badge(ui, map.overlays.group(id).status());
        });
        map.overlays.set_enabled(id, enabled);
    }
}

fn render_status_badge(ui: &mut egui::Ui, status: &LoadStatus) {
    match status {
        LoadStatus::Pending => {
            ui.spinner();
        }
        LoadStatus::Loaded { count, skipped } => {
            let response = ui.label(
                RichText::new(count.to_string())
                    .small()
                    .color(ui_colors::VALUE),
            );
            if *skipped > 0 {
                response.on_hover_text(format!("{} features skipped", skipped));
            }
        }
        LoadStatus::Failed(reason) => {
            ui.label(RichText::new(icons::WARNING).color(ui_colors::ERROR))
                .on_hover_text(reason);
        }
    }
}
