//! Database access layer

pub mod geofences;
pub mod mapper;
pub mod query;

pub use geofences::GeofenceRow;
pub use mapper::{CirclePairing, MappedGeofence, map_row};
pub use query::{GeofenceFields, GeofencePatch, SqlValue, Statement, build_insert, build_update};
