// castcart/core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CastcartError {
  /// Malformed or missing input, or a rule such as a forbidden status transition.
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Authentication required")]
  AuthRequired,

  #[error("Not found: {0}")]
  NotFound(String),

  /// A uniqueness rule that is not idempotent by nature (e.g. podcast slug).
  #[error("Conflict: {0}")]
  Conflict(String),

  /// The backing store could not be reached or the write/read failed.
  #[error("Store unavailable. Source: {source}")]
  StoreUnavailable {
    #[source]
    source: AnyhowError,
  },
}

impl CastcartError {
  pub fn validation(msg: impl Into<String>) -> Self {
    CastcartError::Validation(msg.into())
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    CastcartError::NotFound(msg.into())
  }

  pub fn store(source: impl Into<AnyhowError>) -> Self {
    CastcartError::StoreUnavailable { source: source.into() }
  }

  pub fn is_store_unavailable(&self) -> bool {
    matches!(self, CastcartError::StoreUnavailable { .. })
  }
}

pub type CastcartResult<T, E = CastcartError> = std::result::Result<T, E>;
