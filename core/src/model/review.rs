// castcart/core/src/model/review.rs

use super::actor::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
  pub id: Uuid,
  pub user_id: ActorId,
  pub product_id: Uuid,
  /// 1 to 5 inclusive.
  pub rating: i32,
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
}
