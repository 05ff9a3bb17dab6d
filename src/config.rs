//! Runtime configuration.
//!
//! Defaults reproduce the stock map. On WASM, page globals and the URL query
//! override them; natively, environment variables and an optional JSON file.

use crate::feed::{EARTHQUAKES_URL, PLATE_BOUNDARIES_URL};
use crate::map::{DEFAULT_CENTER, DEFAULT_ZOOM};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read a configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Settings for one map instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Canvas element id on WASM.
    pub container_id: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    /// Tile service credential. Empty disables base layer tiles.
    pub access_token: String,
    pub earthquakes_url: String,
    pub plate_boundaries_url: String,
    /// Upper bound on uploaded tile textures.
    pub max_cached_tiles: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map".to_string(),
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
            access_token: String::new(),
            earthquakes_url: EARTHQUAKES_URL.to_string(),
            plate_boundaries_url: PLATE_BOUNDARIES_URL.to_string(),
            max_cached_tiles: 256,
        }
    }
}

impl MapConfig {
    /// Parses a JSON object; fields it omits keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Uses `token` as the credential unless it is blank.
    fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = token;
        }
        self
    }

    /// Resolves the configuration from the page environment.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        use crate::state::url_state;

        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let mut config = match js_sys::Reflect::get(&window, &"QUAKE_MAP_CONFIG".into()) {
            Ok(value) if !value.is_undefined() && !value.is_null() => {
                match serde_wasm_bindgen::from_value::<MapConfig>(value) {
                    Ok(config) => {
                        log::info!("Using page-supplied map configuration");
                        config
                    }
                    Err(e) => {
                        log::warn!("Ignoring QUAKE_MAP_CONFIG: {}", e);
                        Self::default()
                    }
                }
            }
            _ => Self::default(),
        };

        let token = js_sys::Reflect::get(&window, &"API_KEY".into())
            .ok()
            .and_then(|v| v.as_string());
        config = config.with_token(token);

        let params = url_state::parse_from_url();
        params.apply_to(&mut config);
        config
    }

    /// Resolves the configuration from the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let config = match std::env::var("QUAKE_MAP_CONFIG") {
            Ok(path) => match Self::from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded map configuration from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        let token = std::env::var("MAPBOX_ACCESS_TOKEN")
            .ok()
            .or_else(|| std::env::var("API_KEY").ok());
        config.with_token(token)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.container_id, "map");
        assert_eq!(config.zoom, 3.0);
        assert_eq!(config.center_lat, 31.57853542647338);
        assert_eq!(config.center_lon, -99.580078125);
        assert!(config.access_token.is_empty());
        assert_eq!(config.earthquakes_url, EARTHQUAKES_URL);
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config = MapConfig::from_json(r#"{"zoom": 5, "access_token": "pk.abc"}"#).unwrap();
        assert_eq!(config.zoom, 5.0);
        assert_eq!(config.access_token, "pk.abc");
        assert_eq!(config.container_id, "map");
        assert_eq!(config.plate_boundaries_url, PLATE_BOUNDARIES_URL);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            MapConfig::from_json(r#"{"zoom": "far"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_blank_token_keeps_existing() {
        let base = MapConfig {
            access_token: "pk.file".to_string(),
            ..Default::default()
        };
        assert_eq!(base.clone().with_token(Some("  ".into())).access_token, "pk.file");
        assert_eq!(base.clone().with_token(None).access_token, "pk.file");
        assert_eq!(base.with_token(Some("pk.env".into())).access_token, "pk.env");
    }
}
