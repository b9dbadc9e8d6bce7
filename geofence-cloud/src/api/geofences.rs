//! Geofence API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use shared::error::AppResult;
use shared::models::{Geofence, GeofenceCreate, GeofenceList, GeofenceUpdate};
use uuid::Uuid;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/geofences", get(list).post(create))
        .route("/api/geofences/{id}", get(get_by_id).patch(update).delete(delete))
}

/// GET /api/geofences
pub async fn list(State(state): State<AppState>) -> AppResult<Json<GeofenceList>> {
    Ok(Json(state.geofences.list().await?))
}

/// GET /api/geofences/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Geofence>> {
    Ok(Json(state.geofences.get(id).await?))
}

/// POST /api/geofences
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GeofenceCreate>,
) -> AppResult<(StatusCode, Json<Geofence>)> {
    let geofence = state.geofences.create(payload).await?;
    Ok((StatusCode::CREATED, Json(geofence)))
}

/// PATCH /api/geofences/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GeofenceUpdate>,
) -> AppResult<Json<Geofence>> {
    Ok(Json(state.geofences.update(id, payload).await?))
}

/// DELETE /api/geofences/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.geofences.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
