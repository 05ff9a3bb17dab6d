//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map center and zoom in the query string so reloading restores
//! the view and URLs can be shared.

use crate::config::MapConfig;

/// Parsed URL parameters.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f64>,
}

impl UrlParams {
    /// Overrides the configured initial view with any values present.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))] // Only the page has a URL
    pub fn apply_to(&self, config: &mut MapConfig) {
        if let Some(lat) = self.lat {
            config.center_lat = lat;
        }
        if let Some(lon) = self.lon {
            config.center_lon = lon;
        }
        if let Some(zoom) = self.zoom {
            config.zoom = zoom;
        }
    }
}

/// Parses a query string such as `?lat=10&lon=20&zoom=4`.
///
/// Unknown keys are ignored, as are values that are not finite numbers.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = value.parse::<f64>().ok().filter(|v| v.is_finite());
        match key {
            "lat" => params.lat = value,
            "lon" => params.lon = value,
            "zoom" => params.zoom = value,
            _ => {}
        }
    }

    params
}

/// Renders the view as a query string.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn format_query(lat: f64, lon: f64, zoom: f64) -> String {
    format!("?lat={:.4}&lon={:.4}&zoom={:.2}", lat, lon, zoom)
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|search| parse_query(&search))
        .unwrap_or_default()
}

/// Push the current view to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(lat: f64, lon: f64, zoom: f64) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let query = format_query(lat, lon, zoom);
    let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&query));
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_lat: f64, _lon: f64, _zoom: f64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("?lat=10.5&lon=-20&zoom=4&site=KTLX");
        assert_eq!(
            params,
            UrlParams {
                lat: Some(10.5),
                lon: Some(-20.0),
                zoom: Some(4.0),
            }
        );
    }

    #[test]
    fn test_parse_query_ignores_bad_values() {
        assert_eq!(parse_query(""), UrlParams::default());
        let params = parse_query("lat=abc&lon&zoom=NaN");
        assert_eq!(params, UrlParams::default());
    }

    #[test]
    fn test_apply_overrides_view_only() {
        let mut config = MapConfig::default();
        parse_query("?zoom=6").apply_to(&mut config);
        assert_eq!(config.zoom, 6.0);
        assert_eq!(config.center_lat, MapConfig::default().center_lat);
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let params = parse_query(&format_query(31.5785, -99.5801, 3.0));
        assert_eq!(params.lat, Some(31.5785));
        assert_eq!(params.lon, Some(-99.5801));
        assert_eq!(params.zoom, Some(3.0));
    }
}
