//! Unified service-layer error type for geofence-cloud
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `serde_json::Error`,
//! `BoxError`) and the API-layer error (`AppError`), so the service can use `?`
//! without hand-written logging at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::geo::ShapeError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error, two variants only.
///
/// - `Db`: storage or infrastructure failure (logged, mapped to InternalError)
/// - `App`: business-rule error (passed through to the client as is)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

// Shape serialization failures are internal: input was validated beforehand
impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ShapeError> for ServiceError {
    fn from(e: ShapeError) -> Self {
        ServiceError::App(
            AppError::with_message(ErrorCode::GeofenceShapeInvalid, e.message)
                .with_detail("path", e.path),
        )
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
