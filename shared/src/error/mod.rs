//! Unified error system for the geofence service
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body of error responses
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 7xxx: Geofence errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::GeofenceNotFound);
//!
//! let err = AppError::with_message(ErrorCode::GeofenceShapeInvalid, "Ring 0 must be closed")
//!     .with_detail("path", "geojson.features[0].geometry.coordinates[0]");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 7103);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
