// castcart/app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use castcart::CastcartError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication required")]
  Unauthorized,

  #[error("Operator role required")]
  Forbidden,

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Store unavailable: {0}")]
  Store(#[source] anyhow::Error),
}

impl From<CastcartError> for AppError {
  fn from(err: CastcartError) -> Self {
    match err {
      CastcartError::Validation(m) => AppError::Validation(m),
      CastcartError::AuthRequired => AppError::Unauthorized,
      CastcartError::NotFound(m) => AppError::NotFound(m),
      CastcartError::Conflict(m) => AppError::Conflict(m),
      CastcartError::StoreUnavailable { source } => AppError::Store(source),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized => StatusCode::UNAUTHORIZED,
      AppError::Forbidden => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Full detail stays in the log; the caller gets a generic message.
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    let body = match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::Conflict(m) => json!({"error": m}),
      AppError::Unauthorized => json!({"error": "Authentication required"}),
      AppError::Forbidden => json!({"error": "Operator role required"}),
      AppError::Sqlx(_) | AppError::Store(_) => json!({"error": "Database operation failed"}),
      AppError::Config(_) => json!({"error": "An internal error occurred"}),
    };
    HttpResponse::build(status).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    let cases = [
      (CastcartError::validation("bad"), StatusCode::BAD_REQUEST),
      (CastcartError::AuthRequired, StatusCode::UNAUTHORIZED),
      (CastcartError::not_found("x"), StatusCode::NOT_FOUND),
      (CastcartError::Conflict("slug".into()), StatusCode::CONFLICT),
      (
        CastcartError::store(anyhow::anyhow!("connection reset")),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, expected) in cases {
      assert_eq!(AppError::from(err).status_code(), expected);
    }
  }

  #[test]
  fn server_errors_hide_detail() {
    let err = AppError::from(CastcartError::store(anyhow::anyhow!("password authentication failed")));
    let response = err.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
