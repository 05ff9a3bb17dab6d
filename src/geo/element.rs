//! Renderable map elements produced from features.

use crate::quake::ColorToken;
use eframe::egui::Color32;
use geo_types::Coord;

/// Fixed styling for point markers. The fill color is per feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub fill_opacity: f32,
    pub stroke_weight: f32,
    pub stroke_color: Color32,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            fill_opacity: 0.7,
            stroke_weight: 0.1,
            stroke_color: Color32::BLACK,
        }
    }
}

/// Fixed styling for boundary lines and polygon outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub weight: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color32::RED,
            weight: 2.0,
        }
    }
}

/// Text shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Rendered event time
    pub heading: String,
    /// Event title, verbatim from the feed
    pub title: String,
}

/// A circle marker at a point feature.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMarker {
    pub center: Coord<f64>,
    /// Radius in screen points
    pub radius: f64,
    pub fill: ColorToken,
    pub style: PointStyle,
    pub popup: Option<Popup>,
}

impl CircleMarker {
    pub fn fill_color(&self) -> Color32 {
        self.fill.with_opacity(self.style.fill_opacity)
    }
}

/// A polyline or polygon outline.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    /// One or more coordinate runs (line parts or polygon rings)
    pub parts: Vec<Vec<Coord<f64>>>,
    /// Whether each part should be closed back to its first coordinate
    pub closed: bool,
    pub style: LineStyle,
}

/// An element of a layer group.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderElement {
    Marker(CircleMarker),
    Path(PathElement),
}

impl RenderElement {
    pub fn as_marker(&self) -> Option<&CircleMarker> {
        match self {
            RenderElement::Marker(marker) => Some(marker),
            RenderElement::Path(_) => None,
        }
    }
}
