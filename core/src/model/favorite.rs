// castcart/core/src/model/favorite.rs

use super::actor::ActorId;
use super::product::ProductSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Keyed by `(user_id, product_id)`; there is no other payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
  pub user_id: ActorId,
  pub product_id: Uuid,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
  pub product_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub product: Option<ProductSnapshot>,
}
