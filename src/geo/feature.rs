//! Typed ingest of GeoJSON features.
//!
//! Remote payloads are parsed with the `geojson` crate and converted into
//! [`GeoFeature`]s with a fixed property schema. Features that violate the
//! schema are dropped and the reason is recorded instead of failing the whole
//! collection.

use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry as JsonGeometry, JsonObject, Value};
use serde::Deserialize;

/// Geometry of a feature in (lon, lat) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord<f64>),
    LineString(Vec<Coord<f64>>),
    MultiLineString(Vec<Vec<Coord<f64>>>),
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
    },
    MultiPolygon(Vec<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>)>),
}

/// Earthquake properties carried by a feed feature.
///
/// Boundary features carry none of these; every field is optional so both
/// feeds share one schema.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuakeProperties {
    /// Magnitude
    pub mag: Option<f64>,
    /// Event time in epoch milliseconds
    pub time: Option<i64>,
    /// Human-readable summary, e.g. "M 5.2 - 10 km SW of ..."
    pub title: Option<String>,
}

/// A feature that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub geometry: Geometry,
    pub properties: QuakeProperties,
}

impl GeoFeature {
    pub fn point(lon: f64, lat: f64, properties: QuakeProperties) -> Self {
        Self {
            geometry: Geometry::Point(Coord { x: lon, y: lat }),
            properties,
        }
    }
}

/// Why a feature was dropped during ingest or layer building.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingGeometry,
    InvalidCoordinates,
    UnsupportedGeometry(&'static str),
    InvalidProperties(String),
    MissingMagnitude,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingGeometry => write!(f, "feature has no geometry"),
            SkipReason::InvalidCoordinates => write!(f, "position has fewer than two values"),
            SkipReason::UnsupportedGeometry(kind) => write!(f, "unsupported geometry: {kind}"),
            SkipReason::InvalidProperties(e) => write!(f, "invalid properties: {e}"),
            SkipReason::MissingMagnitude => write!(f, "point feature has no magnitude"),
        }
    }
}

/// Result of ingesting one feature collection.
#[derive(Debug, Clone, Default)]
pub struct ParsedCollection {
    pub features: Vec<GeoFeature>,
    pub skipped: Vec<SkipReason>,
}

impl ParsedCollection {
    fn skip(&mut self, reason: SkipReason) {
        log::debug!("Skipping feature: {}", reason);
        self.skipped.push(reason);
    }
}

/// Parses a GeoJSON document into validated features.
///
/// A bare `Feature` or `Geometry` document is accepted as a collection of one.
pub fn parse_feature_collection(text: &str) -> Result<ParsedCollection, String> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?;

    let mut parsed = ParsedCollection::default();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                convert_feature(feature, &mut parsed);
            }
        }
        GeoJson::Feature(feature) => convert_feature(&feature, &mut parsed),
        GeoJson::Geometry(geometry) => {
            push_geometry(&geometry, QuakeProperties::default(), &mut parsed)
        }
    }

    Ok(parsed)
}

fn convert_feature(feature: &Feature, parsed: &mut ParsedCollection) {
    let Some(geometry) = feature.geometry.as_ref() else {
        parsed.skip(SkipReason::MissingGeometry);
        return;
    };

    // Line and polygon features are styled statically, so their properties
    // are never read.
    if !carries_points(&geometry.value) {
        push_geometry(geometry, QuakeProperties::default(), parsed);
        return;
    }

    let properties = match parse_properties(feature.properties.as_ref()) {
        Ok(p) => p,
        Err(e) => {
            parsed.skip(SkipReason::InvalidProperties(e));
            return;
        }
    };

    push_geometry(geometry, properties, parsed);
}

fn carries_points(value: &Value) -> bool {
    match value {
        Value::Point(_) | Value::MultiPoint(_) => true,
        Value::GeometryCollection(geometries) => {
            geometries.iter().any(|g| carries_points(&g.value))
        }
        _ => false,
    }
}

fn parse_properties(properties: Option<&JsonObject>) -> Result<QuakeProperties, String> {
    match properties {
        Some(object) => serde_json::from_value(serde_json::Value::Object(object.clone()))
            .map_err(|e| e.to_string()),
        None => Ok(QuakeProperties::default()),
    }
}

fn push_geometry(
    geometry: &JsonGeometry,
    properties: QuakeProperties,
    parsed: &mut ParsedCollection,
) {
    match &geometry.value {
        // Each position becomes its own point feature.
        Value::MultiPoint(points) => {
            for position in points {
                match to_coord(position) {
                    Some(coord) => parsed.features.push(GeoFeature {
                        geometry: Geometry::Point(coord),
                        properties: properties.clone(),
                    }),
                    None => parsed.skip(SkipReason::InvalidCoordinates),
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                push_geometry(g, properties.clone(), parsed);
            }
        }
        value => match convert_value(value) {
            Ok(geometry) => parsed.features.push(GeoFeature {
                geometry,
                properties,
            }),
            Err(reason) => parsed.skip(reason),
        },
    }
}

fn convert_value(value: &Value) -> Result<Geometry, SkipReason> {
    match value {
        Value::Point(position) => to_coord(position)
            .map(Geometry::Point)
            .ok_or(SkipReason::InvalidCoordinates),
        Value::LineString(line) => to_line(line).map(Geometry::LineString),
        Value::MultiLineString(lines) => lines
            .iter()
            .map(|line| to_line(line))
            .collect::<Result<Vec<_>, _>>()
            .map(Geometry::MultiLineString),
        Value::Polygon(rings) => {
            let (exterior, holes) = to_rings(rings)?;
            Ok(Geometry::Polygon { exterior, holes })
        }
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| to_rings(rings))
            .collect::<Result<Vec<_>, _>>()
            .map(Geometry::MultiPolygon),
        Value::MultiPoint(_) => Err(SkipReason::UnsupportedGeometry("nested MultiPoint")),
        Value::GeometryCollection(_) => {
            Err(SkipReason::UnsupportedGeometry("nested GeometryCollection"))
        }
    }
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [lon, lat, ..] => Some(Coord { x: *lon, y: *lat }),
        _ => None,
    }
}

fn to_line(line: &[Vec<f64>]) -> Result<Vec<Coord<f64>>, SkipReason> {
    line.iter()
        .map(|position| to_coord(position).ok_or(SkipReason::InvalidCoordinates))
        .collect()
}

#[allow(clippy::type_complexity)]
fn to_rings(
    rings: &[Vec<Vec<f64>>],
) -> Result<(Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>), SkipReason> {
    let Some((exterior, holes)) = rings.split_first() else {
        return Err(SkipReason::InvalidCoordinates);
    };
    let exterior = to_line(exterior)?;
    let holes = holes
        .iter()
        .map(|ring| to_line(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((exterior, holes))
}
