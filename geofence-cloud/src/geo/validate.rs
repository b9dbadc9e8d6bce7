//! Shape validator
//!
//! Walks untrusted JSON and returns typed shapes, stopping at the first
//! violation. Polygon rings are checked in a fixed order: array-ness, minimum
//! length, closure, per-point `[number, number]` shape, numeric validity, range.

use serde_json::Value;
use shared::models::{Circle, Position};

use super::{LAT_RANGE, LON_RANGE, ShapeError};

const POLYGON_ROOT: &str = "geojson";
const CIRCLES_ROOT: &str = "circles";

/// A closed ring needs three distinct vertices plus the repeated first one
pub const MIN_RING_POINTS: usize = 4;

/// Validated `FeatureCollection` of `Polygon` features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<PolygonFeature>,
}

/// A `Feature` whose geometry is a `Polygon`: outer ring first, then holes
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub rings: Vec<Vec<Position>>,
}

/// Output of [`validate_shapes`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedShapes {
    pub polygons: Option<FeatureCollection>,
    pub circles: Option<Vec<Circle>>,
}

impl ValidatedShapes {
    /// No polygon collection and no circles (an empty circle list counts as none)
    pub fn is_empty(&self) -> bool {
        self.polygons.is_none() && self.circles.as_ref().is_none_or(|c| c.is_empty())
    }
}

/// Validate whichever shape inputs were supplied.
pub fn validate_shapes(
    polygons: Option<&Value>,
    circles: Option<&Value>,
) -> Result<ValidatedShapes, ShapeError> {
    let polygons = polygons.map(validate_feature_collection).transpose()?;
    let circles = circles.map(validate_circles).transpose()?;
    Ok(ValidatedShapes { polygons, circles })
}

/// Validate a GeoJSON `FeatureCollection` whose features are all `Polygon`s.
pub fn validate_feature_collection(value: &Value) -> Result<FeatureCollection, ShapeError> {
    let Some(object) = value.as_object() else {
        return Err(ShapeError::new(POLYGON_ROOT, "GeoJSON must be an object"));
    };

    if object.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return Err(ShapeError::new(
            format!("{POLYGON_ROOT}.type"),
            "GeoJSON must be a FeatureCollection",
        ));
    }

    let features = match object.get("features").and_then(Value::as_array) {
        Some(features) if !features.is_empty() => features,
        _ => {
            return Err(ShapeError::new(
                format!("{POLYGON_ROOT}.features"),
                "GeoJSON must have at least one feature",
            ));
        }
    };

    let features = features
        .iter()
        .enumerate()
        .map(|(index, feature)| validate_feature(index, feature))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection { features })
}

fn validate_feature(fi: usize, value: &Value) -> Result<PolygonFeature, ShapeError> {
    let path = format!("{POLYGON_ROOT}.features[{fi}]");

    let Some(feature) = value.as_object() else {
        return Err(ShapeError::new(
            path,
            format!("Feature at index {fi} must be an object"),
        ));
    };

    if feature.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(ShapeError::new(
            format!("{path}.type"),
            format!("Feature at index {fi} must have type 'Feature'"),
        ));
    }

    let Some(geometry) = feature.get("geometry").and_then(Value::as_object) else {
        return Err(ShapeError::new(
            format!("{path}.geometry"),
            format!("Feature at index {fi} must have a geometry object"),
        ));
    };

    if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
        return Err(ShapeError::new(
            format!("{path}.geometry.type"),
            format!("Feature at index {fi} must have a Polygon geometry"),
        ));
    }

    let coordinates_path = format!("{path}.geometry.coordinates");
    let Some(rings) = geometry.get("coordinates").and_then(Value::as_array) else {
        return Err(ShapeError::new(
            coordinates_path,
            format!("Feature at index {fi} must have coordinates array"),
        ));
    };

    let rings = rings
        .iter()
        .enumerate()
        .map(|(ri, ring)| validate_ring(fi, ri, ring, &coordinates_path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PolygonFeature { rings })
}

fn validate_ring(
    fi: usize,
    ri: usize,
    value: &Value,
    coordinates_path: &str,
) -> Result<Vec<Position>, ShapeError> {
    let path = format!("{coordinates_path}[{ri}]");

    let Some(points) = value.as_array() else {
        return Err(ShapeError::new(
            path,
            format!("Ring {ri} of feature {fi} must be an array"),
        ));
    };

    if points.len() < MIN_RING_POINTS {
        return Err(ShapeError::new(
            path,
            format!(
                "Ring {ri} of feature {fi} must have at least {MIN_RING_POINTS} points to form a valid polygon"
            ),
        ));
    }

    let first = &points[0];
    let last = &points[points.len() - 1];
    if !is_pair(first) || !is_pair(last) {
        return Err(ShapeError::new(
            path,
            format!("Points in ring {ri} of feature {fi} must be [longitude, latitude] arrays"),
        ));
    }
    if !same_point(first, last) {
        return Err(ShapeError::new(
            path,
            format!(
                "Ring {ri} of feature {fi} must be closed (first and last points must be identical)"
            ),
        ));
    }

    points
        .iter()
        .enumerate()
        .map(|(pi, point)| validate_point(fi, ri, pi, point, &path))
        .collect()
}

fn validate_point(
    fi: usize,
    ri: usize,
    pi: usize,
    value: &Value,
    ring_path: &str,
) -> Result<Position, ShapeError> {
    let path = format!("{ring_path}[{pi}]");
    let location = format!("point {pi} in ring {ri} of feature {fi}");

    let (lon, lat) = match value.as_array().map(Vec::as_slice) {
        Some([lon, lat]) => (lon, lat),
        _ => {
            return Err(ShapeError::new(
                path,
                format!(
                    "Point {pi} in ring {ri} of feature {fi} must be a [longitude, latitude] array"
                ),
            ));
        }
    };

    let Some(lon) = lon.as_f64().filter(|v| !v.is_nan()) else {
        return Err(ShapeError::new(
            format!("{path}[0]"),
            format!("Longitude of {location} must be a number"),
        ));
    };
    let Some(lat) = lat.as_f64().filter(|v| !v.is_nan()) else {
        return Err(ShapeError::new(
            format!("{path}[1]"),
            format!("Latitude of {location} must be a number"),
        ));
    };

    if !LON_RANGE.contains(&lon) {
        return Err(ShapeError::new(
            format!("{path}[0]"),
            format!("Longitude of {location} must be between -180 and 180"),
        ));
    }
    if !LAT_RANGE.contains(&lat) {
        return Err(ShapeError::new(
            format!("{path}[1]"),
            format!("Latitude of {location} must be between -90 and 90"),
        ));
    }

    Ok([lon, lat])
}

fn is_pair(value: &Value) -> bool {
    value.as_array().is_some_and(|coords| coords.len() == 2)
}

/// Coordinate-wise equality; `10` and `10.0` are the same coordinate.
fn same_point(a: &Value, b: &Value) -> bool {
    let (Some(a), Some(b)) = (a.as_array(), b.as_array()) else {
        return false;
    };
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        })
}

/// Validate a list of `{center: [lon, lat], radius}` objects.
pub fn validate_circles(value: &Value) -> Result<Vec<Circle>, ShapeError> {
    let Some(items) = value.as_array() else {
        return Err(ShapeError::new(CIRCLES_ROOT, "Circles must be an array"));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, circle)| validate_circle(index, circle))
        .collect()
}

fn validate_circle(index: usize, value: &Value) -> Result<Circle, ShapeError> {
    let path = format!("{CIRCLES_ROOT}[{index}]");

    let Some(circle) = value.as_object() else {
        return Err(ShapeError::new(
            path,
            format!("Circle at index {index} must be an object"),
        ));
    };

    let Some(radius) = circle
        .get("radius")
        .and_then(Value::as_f64)
        .filter(|r| r.is_finite() && *r > 0.0)
    else {
        return Err(ShapeError::new(
            format!("{path}.radius"),
            format!("Circle at index {index} must have a positive radius"),
        ));
    };

    let center_path = format!("{path}.center");
    let (lon, lat) = match circle.get("center").and_then(Value::as_array).map(Vec::as_slice) {
        Some([lon, lat]) => (lon, lat),
        _ => {
            return Err(ShapeError::new(
                center_path,
                format!("Circle at index {index} must have a center as [longitude, latitude]"),
            ));
        }
    };

    let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) else {
        return Err(ShapeError::new(
            center_path,
            format!("Circle at index {index} must have numeric coordinates"),
        ));
    };
    if lon.is_nan() || lat.is_nan() {
        return Err(ShapeError::new(
            center_path,
            format!("Circle at index {index} must have numeric coordinates"),
        ));
    }

    if !LON_RANGE.contains(&lon) {
        return Err(ShapeError::new(
            format!("{center_path}[0]"),
            format!("Circle at index {index} has invalid longitude (must be between -180 and 180)"),
        ));
    }
    if !LAT_RANGE.contains(&lat) {
        return Err(ShapeError::new(
            format!("{center_path}[1]"),
            format!("Circle at index {index} has invalid latitude (must be between -90 and 90)"),
        ));
    }

    Ok(Circle {
        center: [lon, lat],
        radius,
    })
}
