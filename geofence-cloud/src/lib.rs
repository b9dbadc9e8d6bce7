//! geofence-cloud: geofence zone management service
//!
//! Validates polygon and circle zone shapes, stores them in PostGIS and
//! serves them back over a JSON CRUD API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod service;
pub mod state;
pub mod validation;

pub use config::Config;
pub use error::{BoxError, ServiceError, ServiceResult};
pub use service::GeofenceService;
pub use state::AppState;
