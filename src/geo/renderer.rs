//! Layer group rendering.
//!
//! Renders overlay elements to the egui canvas.

use super::{CircleMarker, MapProjection, PathElement, RenderElement};
use crate::map::LayerGroup;
use eframe::egui::{Painter, Pos2, Stroke};
use geo_types::Coord;

/// Minimum radius used when hit-testing small markers.
const MIN_HIT_RADIUS: f32 = 3.0;

/// Renders every element of a layer group in insertion order.
pub fn render_layer_group(painter: &Painter, group: &LayerGroup, projection: &MapProjection) {
    for element in group.elements() {
        match element {
            RenderElement::Marker(marker) => render_marker(painter, marker, projection),
            RenderElement::Path(path) => render_path(painter, path, projection),
        }
    }
}

fn render_marker(painter: &Painter, marker: &CircleMarker, projection: &MapProjection) {
    let radius = marker.radius as f32;
    // Non-positive radii are kept as-is in the layer but have nothing to draw.
    if radius <= 0.0 {
        return;
    }

    let pos = projection.geo_to_screen(marker.center);
    if !projection.is_on_screen(pos, radius) {
        return;
    }

    painter.circle(
        pos,
        radius,
        marker.fill_color(),
        Stroke::new(marker.style.stroke_weight, marker.style.stroke_color),
    );
}

fn render_path(painter: &Painter, path: &PathElement, projection: &MapProjection) {
    let stroke = Stroke::new(path.style.weight, path.style.color);
    for part in &path.parts {
        render_line_string(painter, part, path.closed, projection, stroke);
    }
}

/// Renders a line string (boundary segment or polygon ring).
fn render_line_string(
    painter: &Painter,
    coords: &[Coord<f64>],
    closed: bool,
    projection: &MapProjection,
    stroke: Stroke,
) {
    if coords.len() < 2 {
        return;
    }

    // Quick bounding box check for visibility
    let (min_lon, max_lon, min_lat, max_lat) = coords.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), c| {
            (
                min_x.min(c.x),
                max_x.max(c.x),
                min_y.min(c.y),
                max_y.max(c.y),
            )
        },
    );

    if !projection.bbox_visible(min_lon, min_lat, max_lon, max_lat) {
        return;
    }

    let mut screen_points: Vec<Pos2> = coords
        .iter()
        .map(|c| projection.geo_to_screen(*c))
        .collect();
    if closed && screen_points.first() != screen_points.last() {
        screen_points.push(screen_points[0]);
    }

    for window in screen_points.windows(2) {
        if let [p1, p2] = window {
            // Segments crossing the antimeridian would streak across the map.
            if (p2.x - p1.x).abs() > projection.screen_rect.width().max(256.0) {
                continue;
            }
            // Skip very short segments (sub-pixel)
            let dist_sq = (p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2);
            if dist_sq > 0.5 {
                painter.line_segment([*p1, *p2], stroke);
            }
        }
    }
}

/// Finds the topmost drawn marker under `pos`, if any.
///
/// Markers with a non-positive radius are never drawn, so they never match.
pub fn hit_test<'a>(
    group: &'a LayerGroup,
    projection: &MapProjection,
    pos: Pos2,
) -> Option<&'a CircleMarker> {
    group
        .elements()
        .iter()
        .rev()
        .filter_map(RenderElement::as_marker)
        .filter(|marker| marker.radius > 0.0)
        .find(|marker| {
            let center = projection.geo_to_screen(marker.center);
            let radius = (marker.radius as f32).max(MIN_HIT_RADIUS);
            center.distance(pos) <= radius
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoFeature, QuakeProperties};
    use crate::map::OverlayId;
    use crate::quake::{populate, LayerStyle};
    use eframe::egui::{Rect, Vec2};

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut group = LayerGroup::new(OverlayId::Earthquakes);
        let props = |mag: f64, title: &str| QuakeProperties {
            mag: Some(mag),
            time: Some(0),
            title: Some(title.to_string()),
        };
        populate(
            &mut group,
            &[
                GeoFeature::point(0.0, 0.0, props(6.0, "first")),
                GeoFeature::point(0.0, 0.0, props(2.0, "second")),
            ],
            &LayerStyle::earthquakes(),
        );

        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 400.0));
        let projection = MapProjection::new(0.0, 0.0, 3.0, rect);

        let hit = hit_test(&group, &projection, Pos2::new(201.0, 200.0)).unwrap();
        assert_eq!(hit.popup.as_ref().unwrap().title, "second");

        // Outside the small marker but inside the large one.
        let hit = hit_test(&group, &projection, Pos2::new(210.0, 200.0)).unwrap();
        assert_eq!(hit.popup.as_ref().unwrap().title, "first");

        assert!(hit_test(&group, &projection, Pos2::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_hit_test_skips_undrawn_markers() {
        let mut group = LayerGroup::new(OverlayId::Earthquakes);
        let props = |mag: f64| QuakeProperties {
            mag: Some(mag),
            time: Some(0),
            title: Some("quiet".to_string()),
        };
        populate(
            &mut group,
            &[
                GeoFeature::point(0.0, 0.0, props(0.0)),
                GeoFeature::point(0.0, 0.0, props(-0.4)),
            ],
            &LayerStyle::earthquakes(),
        );
        assert_eq!(group.elements().len(), 2);

        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 400.0));
        let projection = MapProjection::new(0.0, 0.0, 3.0, rect);

        assert!(hit_test(&group, &projection, Pos2::new(200.0, 200.0)).is_none());
    }
}
