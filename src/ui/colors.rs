//! Centralized color constants for the UI.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Success/positive indicator.
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    /// Failed loads.
    pub const ERROR: Color32 = Color32::from_rgb(230, 90, 80);
    /// Loads still in flight.
    pub const PENDING: Color32 = Color32::from_rgb(255, 180, 50);
}

/// Colors for the map canvas and its floating controls.
pub mod map {
    use super::Color32;

    /// Shown where no tile has loaded.
    pub const BACKGROUND: Color32 = Color32::from_rgb(221, 221, 221);
    /// Tile placeholder while in flight.
    pub const TILE_PLACEHOLDER: Color32 = Color32::from_rgb(205, 205, 205);
    /// Backdrop of the layer control, legend and popups.
    pub const CONTROL_FILL: Color32 = Color32::from_rgba_premultiplied(245, 245, 245, 235);
    /// Text on control backdrops.
    pub const CONTROL_TEXT: Color32 = Color32::from_rgb(40, 40, 40);
    /// Attribution text.
    pub const ATTRIBUTION_TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Legend swatch outline.
    pub const SWATCH_BORDER: Color32 = Color32::from_rgb(90, 90, 90);
}
