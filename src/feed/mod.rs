//! Remote GeoJSON feeds.
//!
//! Two independent loads populate the map overlays: the past week of
//! earthquakes and the tectonic plate boundaries.

mod channel;

pub use channel::{apply_result, FeedChannel, FeedError, FeedResult};

/// All earthquakes from the past seven days.
pub const EARTHQUAKES_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate boundary lines.
pub const PLATE_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";
