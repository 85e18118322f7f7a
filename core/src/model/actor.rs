// castcart/core/src/model/actor.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an end user as issued by the external identity provider.
/// Opaque to this crate: it is never parsed, only compared and stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
  pub fn new(id: impl Into<String>) -> Self {
    ActorId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for ActorId {
  fn from(id: String) -> Self {
    ActorId(id)
  }
}

impl From<&str> for ActorId {
  fn from(id: &str) -> Self {
    ActorId(id.to_string())
  }
}
