//! Geofence database operations
//!
//! Geometry columns are read back as GeoJSON (`ST_AsGeoJSON`) so the row
//! carries the interchange form directly.

use chrono::{DateTime, Utc};
use shared::models::{AlertType, MultiPoint, MultiPolygon};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::query::{Statement, TABLE};

/// Raw stored row; the three shape columns are independently nullable
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeofenceRow {
    pub id: Uuid,
    pub name: String,
    pub alert_type: AlertType,
    pub categories: Vec<String>,
    pub fill_color: String,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub stroke_width: f64,
    pub geometry: Option<Json<MultiPolygon>>,
    pub circle_centers: Option<Json<MultiPoint>>,
    pub circle_radii: Option<Vec<f64>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 15 decimal digits keeps coordinates intact through the round trip
const SELECT_COLUMNS: &str = r#"
    id, name, alert_type, categories,
    fill_color, stroke_color, fill_opacity, stroke_width,
    ST_AsGeoJSON(geometry, 15)::json AS geometry,
    ST_AsGeoJSON(circle_centers, 15)::json AS circle_centers,
    circle_radii, created_at, updated_at
"#;

// ── Read ──

pub async fn find_all(pool: &PgPool) -> Result<Vec<GeofenceRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {SELECT_COLUMNS} FROM {TABLE} ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {TABLE}"))
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<GeofenceRow>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM {TABLE} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Advisory pre-check; the UNIQUE constraint is authoritative.
pub async fn name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {TABLE} WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))"
    ))
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

// ── Write ──

/// Run a built statement, returning the number of affected rows
pub async fn execute(pool: &PgPool, statement: &Statement) -> Result<u64, sqlx::Error> {
    let result = statement.bind().execute(pool).await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Whether the store rejected a write on a uniqueness constraint
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
