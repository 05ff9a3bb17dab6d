//! Converts feed features into styled layer elements.

use super::style::{magnitude_color, marker_radius};
use crate::geo::{
    CircleMarker, GeoFeature, Geometry, LineStyle, PathElement, PointStyle, Popup, RenderElement,
    SkipReason,
};
use crate::map::LayerGroup;
use chrono::DateTime;

/// Styling applied to every feature of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub point: PointStyle,
    pub line: LineStyle,
    /// Attach popups to point markers
    pub popups: bool,
}

impl LayerStyle {
    /// Earthquake events: magnitude-scaled markers with popups.
    pub fn earthquakes() -> Self {
        Self {
            point: PointStyle::default(),
            line: LineStyle::default(),
            popups: true,
        }
    }

    /// Plate boundaries: fixed red lines.
    pub fn plate_boundaries() -> Self {
        Self {
            point: PointStyle::default(),
            line: LineStyle::default(),
            popups: false,
        }
    }
}

/// Outcome of appending features into a layer group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub added: usize,
    pub skipped: usize,
}

/// Builds elements for the features and appends them to `group`.
pub fn populate(
    group: &mut LayerGroup,
    features: &[GeoFeature],
    style: &LayerStyle,
) -> BuildReport {
    let mut report = BuildReport::default();
    for feature in features {
        match build_element(feature, style) {
            Ok(element) => {
                group.push(element);
                report.added += 1;
            }
            Err(reason) => {
                log::debug!("{}: skipping feature: {}", group.id().label(), reason);
                report.skipped += 1;
            }
        }
    }
    report
}

/// Builds the element for one feature.
///
/// Point features without a magnitude are excluded rather than drawn with a
/// fallback size or color.
pub fn build_element(
    feature: &GeoFeature,
    style: &LayerStyle,
) -> Result<RenderElement, SkipReason> {
    match &feature.geometry {
        Geometry::Point(center) => {
            let mag = feature
                .properties
                .mag
                .ok_or(SkipReason::MissingMagnitude)?;
            let popup = style.popups.then(|| build_popup(feature));
            Ok(RenderElement::Marker(CircleMarker {
                center: *center,
                radius: marker_radius(mag),
                fill: magnitude_color(mag),
                style: style.point,
                popup,
            }))
        }
        Geometry::LineString(line) => Ok(path(vec![line.clone()], false, style)),
        Geometry::MultiLineString(lines) => Ok(path(lines.clone(), false, style)),
        Geometry::Polygon { exterior, holes } => {
            let mut rings = vec![exterior.clone()];
            rings.extend(holes.iter().cloned());
            Ok(path(rings, true, style))
        }
        Geometry::MultiPolygon(polygons) => {
            let rings = polygons
                .iter()
                .flat_map(|(exterior, holes)| std::iter::once(exterior).chain(holes.iter()))
                .cloned()
                .collect();
            Ok(path(rings, true, style))
        }
    }
}

fn path(parts: Vec<Vec<geo_types::Coord<f64>>>, closed: bool, style: &LayerStyle) -> RenderElement {
    RenderElement::Path(PathElement {
        parts,
        closed,
        style: style.line,
    })
}

fn build_popup(feature: &GeoFeature) -> Popup {
    let heading = feature
        .properties
        .time
        .map(format_event_time)
        .unwrap_or_else(|| "Unknown time".to_string());
    let title = feature
        .properties
        .title
        .clone()
        .unwrap_or_else(|| "Untitled event".to_string());
    Popup { heading, title }
}

/// Formats an epoch-millisecond timestamp as a UTC date string.
pub fn format_event_time(epoch_millis: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_millis) {
        Some(dt) => dt.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
        None => format!("{} ms", epoch_millis),
    }
}
