//! Data models
//!
//! Shared between the geofence service and its API clients.

pub mod geofence;

// Re-exports
pub use geofence::*;
