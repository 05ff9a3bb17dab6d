//! Map composition: base layers, overlays, layer control and legend.

mod layer_group;

pub use layer_group::{LayerGroup, LoadStatus, OverlayEntry, OverlayId, OverlayRegistry};

use crate::quake::{legend_entries, LegendEntry};
use crate::tiles::{BaseLayerKind, TileLayer, MAX_ZOOM};

/// Initial map center (latitude, longitude).
pub const DEFAULT_CENTER: (f64, f64) = (31.57853542647338, -99.580078125);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 3.0;

/// Lowest zoom the view may reach.
pub const MIN_ZOOM: f64 = 1.0;

/// Current map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    /// Sets the zoom, clamped to the range tiles exist for.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM as f64);
    }
}

/// Layer control display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerControlOptions {
    pub collapsed: bool,
}

/// A composed map: viewport, base layers, overlays and legend.
pub struct MapHandle {
    /// Page element the map renders into
    pub container_id: String,
    pub view: MapView,
    base_layers: Vec<TileLayer>,
    active_base: BaseLayerKind,
    pub overlays: OverlayRegistry,
    pub layer_control: LayerControlOptions,
    legend: Vec<LegendEntry>,
}

/// Creates the map with its three base layers and two empty overlays.
///
/// Outdoors and Earthquakes start active. The overlays are filled later by
/// the feed loads; the map is usable before either arrives.
pub fn build_map(
    container_id: impl Into<String>,
    center: (f64, f64),
    zoom: f64,
    access_token: &str,
) -> MapHandle {
    let base_layers = BaseLayerKind::all()
        .iter()
        .map(|kind| TileLayer::new(*kind, access_token))
        .collect();

    let mut view = MapView {
        center_lat: center.0,
        center_lon: center.1,
        zoom,
    };
    view.set_zoom(zoom);

    MapHandle {
        container_id: container_id.into(),
        view,
        base_layers,
        active_base: BaseLayerKind::default(),
        overlays: OverlayRegistry::new(),
        layer_control: LayerControlOptions { collapsed: false },
        legend: legend_entries(),
    }
}

impl MapHandle {
    pub fn base_layers(&self) -> &[TileLayer] {
        &self.base_layers
    }

    pub fn active_base(&self) -> BaseLayerKind {
        self.active_base
    }

    /// The tile layer currently drawn under the overlays.
    pub fn active_base_layer(&self) -> Option<&TileLayer> {
        self.base_layers.iter().find(|l| l.kind == self.active_base)
    }

    /// Switches the base layer. Exactly one is active at a time.
    pub fn select_base(&mut self, kind: BaseLayerKind) {
        if self.active_base != kind {
            log::debug!("Base layer: {}", kind.label());
            self.active_base = kind;
        }
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Whether any base layer can fetch tiles.
    pub fn has_credential(&self) -> bool {
        self.base_layers.iter().any(TileLayer::has_credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_map() -> MapHandle {
        build_map("map", DEFAULT_CENTER, DEFAULT_ZOOM, "pk.test")
    }

    #[test]
    fn test_build_map_defaults() {
        let map = default_map();
        assert_eq!(map.container_id, "map");
        assert_eq!(map.view, MapView::default());
        assert_eq!(map.active_base(), BaseLayerKind::Outdoors);
        assert!(!map.layer_control.collapsed);
        assert_eq!(map.legend().len(), 6);

        let labels: Vec<_> = map.base_layers().iter().map(|l| l.label()).collect();
        assert_eq!(labels, vec!["Satellite", "Grayscale", "Outdoors"]);
        assert!(map.base_layers().iter().all(|l| l.access_token == "pk.test"));

        assert!(map.overlays.is_enabled(OverlayId::Earthquakes));
        assert!(!map.overlays.is_enabled(OverlayId::FaultLines));
        assert!(map.overlays.iter().all(|e| e.group.is_empty()));
    }

    #[test]
    fn test_exactly_one_base_layer_active() {
        let mut map = default_map();
        map.select_base(BaseLayerKind::Satellite);
        assert_eq!(map.active_base(), BaseLayerKind::Satellite);
        assert_eq!(
            map.active_base_layer().map(|l| l.kind.style_id()),
            Some("mapbox.satellite")
        );
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut map = build_map("map", DEFAULT_CENTER, 40.0, "");
        assert_eq!(map.view.zoom, 18.0);
        map.view.set_zoom(-2.0);
        assert_eq!(map.view.zoom, MIN_ZOOM);
        assert!(!map.has_credential());
    }
}
