//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::GeofenceNotFound => StatusCode::NOT_FOUND,
            Self::GeofenceNameExists => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationFailed | Self::GeofenceShapeInvalid | Self::GeofenceShapeRequired => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
