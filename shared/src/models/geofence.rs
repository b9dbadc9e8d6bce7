//! Geofence Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::patch::Patch;

/// `[longitude, latitude]`
pub type Position = [f64; 2];

/// Which boundary crossing raises an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    Enter,
    Exit,
    Both,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Enter => "Enter",
            AlertType::Exit => "Exit",
            AlertType::Both => "Both",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enter" => Ok(AlertType::Enter),
            "Exit" => Ok(AlertType::Exit),
            "Both" => Ok(AlertType::Both),
            other => Err(format!("unknown alert type: {other}")),
        }
    }
}

// Stored as TEXT guarded by a CHECK constraint
#[cfg(feature = "db")]
impl sqlx::Type<sqlx::Postgres> for AlertType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "db")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AlertType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(text.parse()?)
    }
}

/// GeoJSON `MultiPolygon` geometry: polygons → rings → positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct MultiPolygon {
    pub coordinates: Vec<Vec<Vec<Position>>>,
}

/// GeoJSON `MultiPoint` geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct MultiPoint {
    pub coordinates: Vec<Position>,
}

/// Circular zone: center plus radius (meters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Position,
    pub radius: f64,
}

/// Display style of a geofence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill_color: String,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub stroke_width: f64,
}

/// Style fields of an update; each one is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// Geofence entity (public view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    pub id: Uuid,
    pub name: String,
    pub alert_type: AlertType,
    pub categories: Vec<String>,
    pub fill_color: String,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub stroke_width: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<MultiPolygon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circles: Option<Vec<Circle>>,
}

/// List response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceList {
    pub geofences: Vec<Geofence>,
    pub total: i64,
}

/// Create geofence payload
///
/// `geojson` and `circles` stay untyped JSON until the shape validator has
/// walked them, so malformed input is reported with its exact location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceCreate {
    pub name: String,
    pub alert_type: AlertType,
    pub categories: Vec<String>,
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circles: Option<Value>,
}

/// Update geofence payload
///
/// Scalar fields are absent-or-set. Shape fields are tri-state: `null` clears
/// the stored shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<AlertType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleUpdate>,
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub geojson: Patch<Value>,
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub circles: Patch<Value>,
}
