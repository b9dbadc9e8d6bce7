//! Error codes for the geofence service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 7xxx: Geofence errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code carried in every error response body
///
/// Serialized as a bare u16 so non-Rust clients can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// A scalar field failed validation
    ValidationFailed = 2,

    // ==================== 7xxx: Geofence ====================
    /// Geofence not found
    GeofenceNotFound = 7101,
    /// Geofence name already in use
    GeofenceNameExists = 7102,
    /// Polygon or circle input is malformed
    GeofenceShapeInvalid = 7103,
    /// Neither polygons nor circles were supplied
    GeofenceShapeRequired = 7104,

    // ==================== 9xxx: System ====================
    /// Storage or other unexpected failure; details stay in the server log
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::GeofenceNotFound => "Geofence not found",
            ErrorCode::GeofenceNameExists => "Geofence with this name already exists",
            ErrorCode::GeofenceShapeInvalid => "Invalid geofence shape",
            ErrorCode::GeofenceShapeRequired => "Either geojson or circles must be provided",
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            7101 => Ok(ErrorCode::GeofenceNotFound),
            7102 => Ok(ErrorCode::GeofenceNameExists),
            7103 => Ok(ErrorCode::GeofenceShapeInvalid),
            7104 => Ok(ErrorCode::GeofenceShapeRequired),
            9001 => Ok(ErrorCode::InternalError),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
