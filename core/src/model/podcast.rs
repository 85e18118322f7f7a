// castcart/core/src/model/podcast.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub logo: Option<String>,
  pub category: String,
  pub host_name: String,
  pub listener_count: Option<i32>,
  pub is_active: bool,
  /// Share of an order's price owed to the partner, in `[0, 1]`.
  pub commission_rate: Decimal,
  pub partner_email: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Podcast {
  pub fn summary(&self) -> PodcastSummary {
    PodcastSummary {
      id: self.id,
      name: self.name.clone(),
      slug: self.slug.clone(),
      logo: self.logo.clone(),
    }
  }
}

/// The podcast fields embedded in every product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastSummary {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub logo: Option<String>,
}
