//! Geographic features, projection, and overlay rendering.
//!
//! This module turns GeoJSON payloads into typed features and draws
//! the resulting layer elements onto the map canvas.

mod element;
mod feature;
mod projection;
mod renderer;

pub use element::{CircleMarker, LineStyle, PathElement, PointStyle, Popup, RenderElement};
pub use feature::{
    parse_feature_collection, GeoFeature, Geometry, ParsedCollection, QuakeProperties, SkipReason,
};
pub use projection::{geo_to_world, MapProjection, TILE_SIZE};
pub use renderer::{hit_test, render_layer_group};
