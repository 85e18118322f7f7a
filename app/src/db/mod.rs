// castcart/app/src/db/mod.rs

pub mod pg_store;
pub mod seed;

pub use pg_store::PgStore;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info, warn};

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Opens the pool, retrying once after a short delay.
pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let options = PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs));

  match options.clone().connect(&config.database_url).await {
    Ok(pool) => Ok(pool),
    Err(first) => {
      warn!(error = %first, "Database connection failed, retrying in {:?}.", RECONNECT_DELAY);
      tokio::time::sleep(RECONNECT_DELAY).await;
      options.connect(&config.database_url).await.map_err(|e| {
        error!(error = %e, "Failed to connect to the database.");
        AppError::Sqlx(e)
      })
    }
  }
}

/// Applies the schema. Every statement is `IF NOT EXISTS`, so reruns are no-ops.
pub async fn migrate(pool: &PgPool) -> Result<()> {
  sqlx::raw_sql(SCHEMA).execute(pool).await.map_err(|e| {
    error!(error = %e, "Schema migration failed.");
    AppError::Sqlx(e)
  })?;
  info!("Database schema is up to date.");
  Ok(())
}
