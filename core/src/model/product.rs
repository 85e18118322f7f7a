// castcart/core/src/model/product.rs

use super::podcast::PodcastSummary;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  /// Display order matters, the first image is the cover.
  pub images: Vec<String>,
  pub category: String,
  pub sizes: BTreeSet<String>,
  pub colors: BTreeSet<String>,
  pub inventory: i32,
  pub podcast_id: Uuid,
  pub affiliate_url: String,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn snapshot(&self) -> ProductSnapshot {
    ProductSnapshot {
      id: self.id,
      name: self.name.clone(),
      price: self.price,
      images: self.images.clone(),
      category: self.category.clone(),
    }
  }
}

/// A product joined with its owning podcast. The podcast is optional because
/// the join is a left join: a product is never hidden for lack of an owner row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
  #[serde(flatten)]
  pub product: Product,
  pub podcast: Option<PodcastSummary>,
}

/// Projection of a product shown next to a favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
  pub id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub images: Vec<String>,
  pub category: String,
}
