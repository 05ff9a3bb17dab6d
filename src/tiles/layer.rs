//! Base tile layers and slippy-map tile addressing.

use crate::geo::{geo_to_world, MapProjection, TILE_SIZE};
use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

/// URL template shared by every base layer.
pub const MAPBOX_URL_TEMPLATE: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";

/// Attribution shown under the base layer.
pub const ATTRIBUTION: &str =
    "Map data \u{a9} OpenStreetMap contributors, CC-BY-SA, Imagery \u{a9} Mapbox";

/// Highest zoom level the tile service provides.
pub const MAX_ZOOM: u8 = 18;

/// The interchangeable base maps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseLayerKind {
    Satellite,
    Grayscale,
    #[default]
    Outdoors,
}

impl BaseLayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            BaseLayerKind::Satellite => "Satellite",
            BaseLayerKind::Grayscale => "Grayscale",
            BaseLayerKind::Outdoors => "Outdoors",
        }
    }

    /// Tile service style identifier.
    pub fn style_id(&self) -> &'static str {
        match self {
            BaseLayerKind::Satellite => "mapbox.satellite",
            BaseLayerKind::Grayscale => "mapbox.light",
            BaseLayerKind::Outdoors => "mapbox.outdoors",
        }
    }

    /// Order in the layer control.
    pub fn all() -> &'static [BaseLayerKind] {
        &[
            BaseLayerKind::Satellite,
            BaseLayerKind::Grayscale,
            BaseLayerKind::Outdoors,
        ]
    }
}

/// Address of one tile in the slippy-map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

/// A raster base layer from the tile service.
#[derive(Debug, Clone)]
pub struct TileLayer {
    pub kind: BaseLayerKind,
    pub url_template: String,
    pub access_token: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn new(kind: BaseLayerKind, access_token: impl Into<String>) -> Self {
        Self {
            kind,
            url_template: MAPBOX_URL_TEMPLATE.to_string(),
            access_token: access_token.into(),
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Whether tiles can be requested at all.
    pub fn has_credential(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// Interpolates the URL template for a tile.
    pub fn tile_url(&self, tile: TileId) -> String {
        self.url_template
            .replace("{id}", self.kind.style_id())
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{accessToken}", &self.access_token)
    }

    /// Tiles covering the projection's screen rect, with their screen rects.
    ///
    /// Tiles come from the integer zoom nearest the view zoom and are scaled
    /// to fit. Columns wrap around the antimeridian; rows outside the world
    /// are omitted.
    pub fn visible_tiles(&self, projection: &MapProjection) -> Vec<(TileId, Rect)> {
        let z = projection.zoom.round().clamp(0.0, self.max_zoom as f64) as u8;
        let n = 1i64 << z;
        let scale = 2f64.powf(projection.zoom - z as f64);
        let tile_extent = TILE_SIZE * scale;

        let center = geo_to_world(
            Coord {
                x: projection.center_lon,
                y: projection.center_lat,
            },
            z as f64,
        );
        let rect = projection.screen_rect;
        let half_w = rect.width() as f64 / 2.0 / scale;
        let half_h = rect.height() as f64 / 2.0 / scale;

        let min_x = ((center.x - half_w) / TILE_SIZE).floor() as i64;
        let max_x = ((center.x + half_w) / TILE_SIZE).floor() as i64;
        let min_y = (((center.y - half_h) / TILE_SIZE).floor() as i64).max(0);
        let max_y = (((center.y + half_h) / TILE_SIZE).floor() as i64).min(n - 1);

        let origin = rect.center();
        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let screen_min = Pos2::new(
                    origin.x + ((x as f64 * TILE_SIZE - center.x) * scale) as f32,
                    origin.y + ((y as f64 * TILE_SIZE - center.y) * scale) as f32,
                );
                let screen = Rect::from_min_size(
                    screen_min,
                    Vec2::splat(tile_extent as f32),
                );
                tiles.push((
                    TileId::new(z, x.rem_euclid(n) as u32, y as u32),
                    screen,
                ));
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_template() {
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "pk.test");
        assert_eq!(
            layer.tile_url(TileId::new(3, 1, 3)),
            "https://api.tiles.mapbox.com/v4/mapbox.outdoors/3/1/3.png?access_token=pk.test"
        );
        let gray = TileLayer::new(BaseLayerKind::Grayscale, "pk.test");
        assert!(gray.tile_url(TileId::new(0, 0, 0)).contains("/mapbox.light/0/0/0.png"));
    }

    #[test]
    fn test_credential_detection() {
        assert!(!TileLayer::new(BaseLayerKind::Satellite, "  ").has_credential());
        assert!(TileLayer::new(BaseLayerKind::Satellite, "pk.abc").has_credential());
    }

    #[test]
    fn test_default_view_center_tile() {
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "pk");
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let projection = MapProjection::new(31.57853542647338, -99.580078125, 3.0, rect);
        let (center_tile, _) = layer
            .visible_tiles(&projection)
            .into_iter()
            .find(|(_, screen)| screen.contains(rect.center()))
            .unwrap();
        assert_eq!(center_tile, TileId::new(3, 1, 3));
    }

    #[test]
    fn test_visible_tiles_cover_world_at_zoom_one() {
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "pk");
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(512.0, 512.0));
        let projection = MapProjection::new(0.0, 0.0, 1.0, rect);
        let tiles = layer.visible_tiles(&projection);
        let ids: Vec<_> = tiles.iter().map(|(id, _)| *id).collect();
        // The right/bottom edges touch the next row and column; those rows
        // fall outside the world and are dropped, the column wraps.
        assert!(ids.contains(&TileId::new(1, 0, 0)));
        assert!(ids.contains(&TileId::new(1, 1, 1)));
        assert!(ids.iter().all(|id| id.y < 2 && id.x < 2));

        let (_, first) = tiles
            .iter()
            .find(|(id, _)| *id == TileId::new(1, 0, 0))
            .unwrap();
        assert_eq!(first.min, Pos2::ZERO);
        assert_eq!(first.width(), 256.0);
    }

    #[test]
    fn test_fractional_zoom_scales_tiles() {
        let layer = TileLayer::new(BaseLayerKind::Outdoors, "pk");
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 300.0));
        let projection = MapProjection::new(0.0, 0.0, 2.4, rect);
        let tiles = layer.visible_tiles(&projection);
        assert!(tiles.iter().all(|(id, _)| id.z == 2));
        let expected = 256.0 * 2f32.powf(0.4);
        assert!((tiles[0].1.width() - expected).abs() < 1e-3);
    }
}
