//! Central canvas UI: base tiles, overlays, popups and attribution.

use super::colors::map as map_colors;
use crate::geo::{hit_test, render_layer_group, MapProjection};
use crate::map::{MapHandle, MapView};
use crate::state::AppState;
use crate::tiles::{TileCache, ATTRIBUTION};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, RichText, Sense, Vec2};

/// Zoom levels per point of scroll.
const SCROLL_ZOOM_RATE: f64 = 0.004;

pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    map: &mut MapHandle,
    tiles: &mut TileCache,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) =
                ui.allocate_painter(available_size, Sense::click_and_drag());
            let rect = response.rect;

            painter.rect_filled(rect, 0.0, map_colors::BACKGROUND);

            let projection = MapProjection::new(
                map.view.center_lat,
                map.view.center_lon,
                map.view.zoom,
                rect,
            );

            render_base_layer(ctx, &painter, map, tiles, &projection);

            // Registration order: later overlays draw on top.
            for group in map.overlays.visible_groups() {
                render_layer_group(&painter, group, &projection);
            }

            draw_attribution(&painter, &rect);

            handle_marker_click(&response, &projection, state, map);
            handle_canvas_interaction(&response, &projection, map);

            render_popup(ctx, state, &projection);
        });
}

fn render_base_layer(
    ctx: &egui::Context,
    painter: &Painter,
    map: &MapHandle,
    tiles: &mut TileCache,
    projection: &MapProjection,
) {
    let Some(layer) = map.active_base_layer() else {
        return;
    };

    let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    for (tile, screen) in layer.visible_tiles(projection) {
        match tiles.get_or_request(ctx, layer, tile) {
            Some(texture) => {
                painter.image(texture.id(), screen, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(screen.shrink(0.5), 0.0, map_colors::TILE_PLACEHOLDER);
            }
        }
    }
}

fn draw_attribution(painter: &Painter, rect: &Rect) {
    let font_id = egui::FontId::proportional(10.0);
    let galley = painter.layout_no_wrap(
        ATTRIBUTION.to_string(),
        font_id,
        map_colors::ATTRIBUTION_TEXT,
    );
    let pos = rect.left_bottom() + Vec2::new(4.0, -galley.size().y - 4.0);
    let backdrop = Rect::from_min_size(pos, galley.size()).expand(2.0);
    painter.rect_filled(backdrop, 2.0, map_colors::CONTROL_FILL);
    painter.galley(pos, galley, map_colors::ATTRIBUTION_TEXT);
}

/// Opens the popup of the topmost clicked marker, or closes any open popup
/// when the click lands on empty map.
fn handle_marker_click(
    response: &egui::Response,
    projection: &MapProjection,
    state: &mut AppState,
    map: &MapHandle,
) {
    if !response.clicked() {
        return;
    }
    let Some(pos) = response.interact_pointer_pos() else {
        return;
    };

    let groups: Vec<_> = map.overlays.visible_groups().collect();
    let hit = groups
        .into_iter()
        .rev()
        .filter_map(|group| hit_test(group, projection, pos))
        .find_map(|marker| marker.popup.as_ref().map(|popup| (marker.center, popup)));

    match hit {
        Some((anchor, popup)) => state.open_popup(anchor, popup.clone()),
        None => state.close_popup(),
    }
}

fn handle_canvas_interaction(
    response: &egui::Response,
    projection: &MapProjection,
    map: &mut MapHandle,
) {
    let drag = if response.dragged() {
        response.drag_delta()
    } else {
        Vec2::ZERO
    };

    let mut zoom_change = 0.0;
    if response.hovered() {
        let (scroll, pinch) = response
            .ctx
            .input(|i| (i.raw_scroll_delta.y, i.zoom_delta()));
        zoom_change += scroll as f64 * SCROLL_ZOOM_RATE + (pinch as f64).log2();
    }
    if response.double_clicked() {
        zoom_change += 1.0;
    }

    // Keep the point under the cursor stationary
    let anchor = response
        .hover_pos()
        .unwrap_or_else(|| projection.screen_rect.center());
    apply_pan_zoom(&mut map.view, projection.screen_rect, drag, zoom_change, anchor);
}

/// Pans the view by `drag`, then zooms by `zoom_change` around `anchor`.
///
/// The zoom anchor is resolved against the panned view, so a drag and a
/// scroll in the same frame both take effect.
fn apply_pan_zoom(view: &mut MapView, rect: Rect, drag: Vec2, zoom_change: f64, anchor: Pos2) {
    if drag != Vec2::ZERO {
        let projection = MapProjection::new(view.center_lat, view.center_lon, view.zoom, rect);
        let (lat, lon) = projection.panned_center(drag);
        view.center_lat = lat;
        view.center_lon = lon;
    }

    if zoom_change != 0.0 {
        let projection = MapProjection::new(view.center_lat, view.center_lon, view.zoom, rect);
        view.set_zoom(view.zoom + zoom_change);
        let (lat, lon) = projection.zoomed_center(anchor, view.zoom);
        view.center_lat = lat;
        view.center_lon = lon;
    }
}

fn render_popup(ctx: &egui::Context, state: &mut AppState, projection: &MapProjection) {
    let Some(open) = &state.open_popup else {
        return;
    };

    let anchor = projection.geo_to_screen(open.anchor);
    if !projection.is_on_screen(anchor, 0.0) {
        return;
    }

    let mut close = false;
    egui::Area::new(egui::Id::new("marker_popup"))
        .fixed_pos(anchor + Vec2::new(0.0, -8.0))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(map_colors::CONTROL_FILL)
                .show(ui, |ui| {
                    ui.set_max_width(260.0);
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(&open.popup.heading)
                                .strong()
                                .color(map_colors::CONTROL_TEXT),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            close = ui
                                .small_button(egui_phosphor::regular::X)
                                .on_hover_text("Close")
                                .clicked();
                        });
                    });
                    ui.separator();
                    // Plain text only; titles are never interpreted as markup.
                    ui.label(RichText::new(&open.popup.title).color(map_colors::CONTROL_TEXT));
                });
        });

    if close {
        state.close_popup();
    }
}
