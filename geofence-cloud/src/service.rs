//! Geofence service
//!
//! Sequences every write as validate → normalize → name pre-check → build →
//! execute → read back. The pre-check and the write are separate round trips
//! with no transaction around them, so a concurrent create can still slip
//! past the pre-check; the UNIQUE constraint on `name` catches that and is
//! reported as the same conflict.

use shared::error::{AppError, ErrorCode};
use shared::models::{Geofence, GeofenceCreate, GeofenceList, GeofenceUpdate};
use shared::patch::Patch;
use sqlx::PgPool;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::db::geofences::{self, GeofenceRow};
use crate::db::{GeofenceFields, GeofencePatch, Statement, build_insert, build_update, map_row};
use crate::error::{ServiceError, ServiceResult};
use crate::geo::{self, ShapeError};
use crate::validation;

#[derive(Clone)]
pub struct GeofenceService {
    pool: PgPool,
    /// Every operation runs inside this span
    span: Span,
}

impl GeofenceService {
    pub fn new(pool: PgPool, span: Span) -> Self {
        Self { pool, span }
    }

    pub async fn create(&self, payload: GeofenceCreate) -> ServiceResult<Geofence> {
        async move {
            validation::validate_create(&payload)?;

            let shapes = geo::validate_shapes(payload.geojson.as_ref(), payload.circles.as_ref())?;
            if shapes.is_empty() {
                return Err(AppError::new(ErrorCode::GeofenceShapeRequired).into());
            }
            let normalized = geo::normalize_shapes(&shapes);

            if geofences::name_exists(&self.pool, &payload.name, None).await? {
                return Err(name_conflict(&payload.name).into());
            }

            let id = Uuid::new_v4();
            let fields = GeofenceFields {
                name: payload.name,
                alert_type: payload.alert_type,
                categories: payload.categories,
                style: payload.style,
            };
            let statement = build_insert(id, &fields, &normalized)?;
            self.write(&statement, &fields.name).await?;

            tracing::info!(geofence_id = %id, name = %fields.name, "Geofence created");
            self.read(id).await
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn update(&self, id: Uuid, payload: GeofenceUpdate) -> ServiceResult<Geofence> {
        async move {
            validation::validate_update(&payload)?;
            let patch = to_patch(payload)?;

            if let Some(name) = &patch.name
                && geofences::name_exists(&self.pool, name, Some(id)).await?
            {
                return Err(name_conflict(name).into());
            }

            let statement = build_update(id, &patch)?;
            let name = patch.name.as_deref().unwrap_or_default();
            if self.write(&statement, name).await? == 0 {
                return Err(not_found(id).into());
            }

            tracing::info!(geofence_id = %id, "Geofence updated");
            self.read(id).await
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn list(&self) -> ServiceResult<GeofenceList> {
        async move {
            let rows = geofences::find_all(&self.pool).await?;
            let total = geofences::count_all(&self.pool).await?;
            Ok(GeofenceList {
                geofences: rows.into_iter().map(to_view).collect(),
                total,
            })
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Geofence> {
        self.read(id).instrument(self.span.clone()).await
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        async move {
            if geofences::delete(&self.pool, id).await? == 0 {
                return Err(not_found(id).into());
            }
            tracing::info!(geofence_id = %id, "Geofence deleted");
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    async fn read(&self, id: Uuid) -> ServiceResult<Geofence> {
        let row = geofences::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(to_view(row))
    }

    async fn write(&self, statement: &Statement, name: &str) -> ServiceResult<u64> {
        geofences::execute(&self.pool, statement)
            .await
            .map_err(|e| write_error(e, name))
    }
}

/// A uniqueness violation on write becomes the name conflict
fn write_error(err: sqlx::Error, name: &str) -> ServiceError {
    if geofences::is_unique_violation(&err) {
        tracing::warn!(name = %name, "Geofence name taken at write time");
        return name_conflict(name).into();
    }
    err.into()
}

fn to_view(row: GeofenceRow) -> Geofence {
    let mapped = map_row(row);
    if mapped.circles.is_integrity_fault() {
        tracing::warn!(
            geofence_id = %mapped.geofence.id,
            pairing = ?mapped.circles,
            "Stored circle centers and radii do not pair, circles omitted"
        );
    }
    mapped.geofence
}

fn name_conflict(name: &str) -> AppError {
    AppError::new(ErrorCode::GeofenceNameExists).with_detail("name", name)
}

fn not_found(id: Uuid) -> AppError {
    AppError::new(ErrorCode::GeofenceNotFound).with_detail("id", id.to_string())
}

/// Translate an update body into column changes.
///
/// Shapes are validated and normalized here. Circles drive two columns, so
/// clearing them (or sending an empty list) clears centers and radii together.
pub fn to_patch(payload: GeofenceUpdate) -> Result<GeofencePatch, ShapeError> {
    let geometry = payload.geojson.try_map(|value| {
        geo::validate_feature_collection(&value).map(|fc| geo::to_multi_polygon(&fc))
    })?;

    let (circle_centers, circle_radii) =
        match payload.circles.try_map(|value| geo::validate_circles(&value))? {
            Patch::Unset => (Patch::Unset, Patch::Unset),
            Patch::Set(circles) if !circles.is_empty() => {
                let (centers, radii) = geo::to_centers_and_radii(&circles);
                (Patch::Set(centers), Patch::Set(radii))
            }
            _ => (Patch::Clear, Patch::Clear),
        };

    let style = payload.style.unwrap_or_default();
    Ok(GeofencePatch {
        name: payload.name,
        alert_type: payload.alert_type,
        categories: payload.categories,
        fill_color: style.fill_color,
        stroke_color: style.stroke_color,
        fill_opacity: style.fill_opacity,
        stroke_width: style.stroke_width,
        geometry,
        circle_centers,
        circle_radii,
    })
}
