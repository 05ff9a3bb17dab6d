//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lat/lon) and
//! screen coordinates using spherical Web Mercator, the projection used
//! by slippy-map tile services.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;
use std::f64::consts::PI;

/// Edge length of a map tile in screen points.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Projects (lon, lat) to world pixel coordinates at a zoom level.
///
/// The world is `TILE_SIZE * 2^zoom` points wide with the origin at the
/// north-west corner.
pub fn geo_to_world(coord: Coord<f64>, zoom: f64) -> Coord<f64> {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let sin = lat.sin();
    Coord {
        x: (coord.x + 180.0) / 360.0 * scale,
        y: (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale,
    }
}

/// Inverse of [`geo_to_world`].
pub fn world_to_geo(world: Coord<f64>, zoom: f64) -> Coord<f64> {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lon = world.x / scale * 360.0 - 180.0;
    let n = PI - 2.0 * PI * world.y / scale;
    let lat = n.sinh().atan().to_degrees();
    Coord { x: lon, y: lat }
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center latitude of the view
    pub center_lat: f64,
    /// Center longitude of the view
    pub center_lon: f64,
    /// Fractional zoom level
    pub zoom: f64,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl MapProjection {
    pub fn new(center_lat: f64, center_lon: f64, zoom: f64, screen_rect: Rect) -> Self {
        Self {
            center_lat,
            center_lon,
            zoom,
            screen_rect,
        }
    }

    fn center_world(&self) -> Coord<f64> {
        geo_to_world(
            Coord {
                x: self.center_lon,
                y: self.center_lat,
            },
            self.zoom,
        )
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let world = geo_to_world(coord, self.zoom);
        let center = self.center_world();
        let origin = self.screen_rect.center();
        Pos2::new(
            origin.x + (world.x - center.x) as f32,
            origin.y + (world.y - center.y) as f32,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let center = self.center_world();
        let offset = pos - self.screen_rect.center();
        world_to_geo(
            Coord {
                x: center.x + offset.x as f64,
                y: center.y + offset.y as f64,
            },
            self.zoom,
        )
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

    /// Checks if a screen position lies on the canvas, allowing a margin in points.
    pub fn is_on_screen(&self, pos: Pos2, margin: f32) -> bool {
        self.screen_rect.expand(margin).contains(pos)
    }

    /// Checks if a bounding box intersects with the visible bounds.
    pub fn bbox_visible(&self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> bool {
        let (vis_min_lon, vis_min_lat, vis_max_lon, vis_max_lat) = self.visible_bounds();

        // Add margin for edge cases
        let margin = 1.0;
        !(max_lon < vis_min_lon - margin
            || min_lon > vis_max_lon + margin
            || max_lat < vis_min_lat - margin
            || min_lat > vis_max_lat + margin)
    }

    /// Center (lat, lon) after dragging the map by `delta` screen points.
    pub fn panned_center(&self, delta: Vec2) -> (f64, f64) {
        let coord = self.screen_to_geo(self.screen_rect.center() - delta);
        (coord.y, wrap_longitude(coord.x))
    }

    /// Center (lat, lon) that keeps the point under `anchor` fixed when
    /// changing to `new_zoom`.
    pub fn zoomed_center(&self, anchor: Pos2, new_zoom: f64) -> (f64, f64) {
        let anchored = self.screen_to_geo(anchor);
        let anchored_world = geo_to_world(anchored, new_zoom);
        let offset = anchor - self.screen_rect.center();
        let center = world_to_geo(
            Coord {
                x: anchored_world.x - offset.x as f64,
                y: anchored_world.y - offset.y as f64,
            },
            new_zoom,
        );
        (center.y, wrap_longitude(center.x))
    }
}

/// Normalizes a longitude into `[-180, 180)`.
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
