//! Geometry pipeline: shape validation and normalization
//!
//! Client shape input arrives as untyped JSON. [`validate`] walks it and either
//! produces typed shapes or stops at the first violation with a [`ShapeError`];
//! [`normalize`] turns the typed shapes into the storage representation
//! (one `MultiPolygon`, plus a `MultiPoint` of circle centers with a parallel
//! radius list).
//!
//! Both stages are pure: no I/O and no logging.

pub mod normalize;
pub mod validate;

pub use normalize::{NormalizedShapes, normalize_shapes, to_centers_and_radii, to_multi_polygon};
pub use validate::{
    FeatureCollection, PolygonFeature, ValidatedShapes, validate_circles,
    validate_feature_collection, validate_shapes,
};

use thiserror::Error;

/// Longitude bounds, degrees
pub const LON_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;
/// Latitude bounds, degrees
pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// First violation found in a shape payload
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ShapeError {
    /// Location of the offending value, e.g. `geojson.features[0].geometry.coordinates[1][3]`
    pub path: String,
    /// Human-readable description naming feature / ring / point indices
    pub message: String,
}

impl ShapeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
