// castcart/app/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Round-trips the store; 503 when it cannot be reached.
pub async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let timestamp = Utc::now().to_rfc3339();
  match app_state.services.catalog.health().await {
    Ok(()) => HttpResponse::Ok().json(json!({
      "status": "healthy",
      "database": "connected",
      "timestamp": timestamp,
    })),
    Err(e) => {
      error!(error = %e, "Health check failed.");
      HttpResponse::ServiceUnavailable().json(json!({
        "status": "unhealthy",
        "error": "Database connection failed",
        "timestamp": timestamp,
      }))
    }
  }
}
