// castcart/app/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use castcart_app::config::AppConfig;
use castcart_app::db::{self, PgStore};
use castcart_app::state::AppState;
use castcart_app::{telemetry, web};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Configuration decides the log format, so it loads before tracing exists.
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      eprintln!("Failed to load application configuration: {}", e);
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  telemetry::init_tracing(app_config.log_format);
  tracing::info!(format = ?app_config.log_format, "Starting castcart server...");

  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())),
  };

  if app_config.run_migrations {
    if let Err(e) = db::migrate(&db_pool).await {
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  }

  let app_state = AppState::new(Arc::new(PgStore::new(db_pool)), app_config.settings.clone());

  if app_config.seed_db {
    if let Err(e) = db::seed::seed_demo_catalog(&app_state.services).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
