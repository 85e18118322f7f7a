// castcart/core/src/model/order.rs

use super::actor::ActorId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Fulfilled,
  Cancelled,
  Refunded,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 4] = [
    OrderStatus::Pending,
    OrderStatus::Fulfilled,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Fulfilled => "fulfilled",
      OrderStatus::Cancelled => "cancelled",
      OrderStatus::Refunded => "refunded",
    }
  }

  /// Status only moves forward: pending -> fulfilled | cancelled, fulfilled -> refunded.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    matches!(
      (self, next),
      (OrderStatus::Pending, OrderStatus::Fulfilled)
        | (OrderStatus::Pending, OrderStatus::Cancelled)
        | (OrderStatus::Fulfilled, OrderStatus::Refunded)
    )
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == wanted)
      .ok_or_else(|| format!("unknown order status '{}'", wanted))
  }
}

/// A recorded sale. `price` is the line total and `commission` was fixed when
/// the row was written; only `status` (and `updated_at`) ever change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub user_id: Option<ActorId>,
  pub product_id: Uuid,
  pub podcast_id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
  pub commission: Decimal,
  pub status: OrderStatus,
  pub external_order_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// An order as shown in a user's order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub id: Uuid,
  pub quantity: i32,
  pub price: Decimal,
  pub commission: Decimal,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub product: Option<ProductBrief>,
  pub podcast: Option<PodcastBrief>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBrief {
  pub id: Uuid,
  pub name: String,
  pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastBrief {
  pub id: Uuid,
  pub name: String,
}
