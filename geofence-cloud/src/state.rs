//! Application state

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::error::BoxError;
use crate::service::GeofenceService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub geofences: GeofenceService,
}

impl AppState {
    /// Connect, run embedded migrations and wire services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        let span = tracing::info_span!("geofence_service");
        Self {
            geofences: GeofenceService::new(pool, span),
        }
    }
}
