//! Shared types for the geofence service
//!
//! Wire and domain types used by the service and its clients:
//! error codes, the error response body, the geofence models and
//! the tri-state [`patch::Patch`] used by partial updates.

pub mod error;
pub mod models;
pub mod patch;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
