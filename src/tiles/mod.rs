//! Raster base layers from the tile service.

mod cache;
mod layer;

pub use cache::{TileCache, TileError, TileKey};
pub use layer::{BaseLayerKind, TileId, TileLayer, ATTRIBUTION, MAPBOX_URL_TEMPLATE, MAX_ZOOM};
