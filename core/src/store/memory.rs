// castcart/core/src/store/memory.rs

//! In-process store backed by plain vectors behind one `parking_lot::RwLock`.
//!
//! Every trait method takes the lock once, does its work synchronously and
//! releases it before returning, so no guard ever lives across an `.await`.

use super::{CatalogStore, ClickLog, FavoriteStore, OrderStore, ReviewStore};
use crate::command::{PodcastRef, ProductQuery};
use crate::error::{CastcartError, CastcartResult};
use crate::model::{
  ActorId, AffiliateClick, DailyClicks, Favorite, FavoriteEntry, Order, OrderStatus, OrderSummary, OrderTotals,
  Podcast, PodcastBrief, Product, ProductBrief, ProductListing, Review,
};
use crate::service::analytics::bucket_clicks_by_day;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
  podcasts: Vec<Podcast>,
  products: Vec<Product>,
  clicks: Vec<AffiliateClick>,
  orders: Vec<Order>,
  favorites: Vec<Favorite>,
  reviews: Vec<Review>,
}

impl Tables {
  fn podcast(&self, id: Uuid) -> Option<&Podcast> {
    self.podcasts.iter().find(|p| p.id == id)
  }

  fn product(&self, id: Uuid) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  fn listing(&self, product: &Product) -> ProductListing {
    ProductListing {
      product: product.clone(),
      podcast: self.podcast(product.podcast_id).map(Podcast::summary),
    }
  }
}

/// Rows in insertion order, reversed, then stably sorted newest first: ties
/// on the timestamp resolve to the most recently inserted row.
fn checked_sum(total: Decimal, amount: Decimal) -> CastcartResult<Decimal> {
  total
    .checked_add(amount)
    .ok_or_else(|| CastcartError::store(anyhow::anyhow!("order totals overflowed")))
}

fn newest_first<T: Clone>(rows: &[T], ts: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
  let mut out: Vec<T> = rows.iter().rev().cloned().collect();
  out.sort_by(|a, b| ts(b).cmp(&ts(a)));
  out
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
  offline: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// While offline every call fails with `StoreUnavailable`, the way a lost
  /// database connection would surface.
  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  /// Number of favorite rows for the key, for asserting uniqueness.
  pub fn favorite_rows(&self, user_id: &ActorId, product_id: Uuid) -> usize {
    self
      .tables
      .read()
      .favorites
      .iter()
      .filter(|f| &f.user_id == user_id && f.product_id == product_id)
      .count()
  }

  pub fn click_count(&self) -> usize {
    self.tables.read().clicks.len()
  }

  fn online(&self) -> CastcartResult<()> {
    if self.offline.load(Ordering::SeqCst) {
      return Err(CastcartError::store(anyhow::anyhow!("memory store is offline")));
    }
    Ok(())
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn ping(&self) -> CastcartResult<()> {
    self.online()
  }

  async fn list_active_podcasts(&self) -> CastcartResult<Vec<Podcast>> {
    self.online()?;
    let tables = self.tables.read();
    let active: Vec<Podcast> = tables.podcasts.iter().filter(|p| p.is_active).cloned().collect();
    Ok(newest_first(&active, |p| p.created_at))
  }

  async fn podcast_by_id(&self, id: Uuid) -> CastcartResult<Option<Podcast>> {
    self.online()?;
    Ok(self.tables.read().podcast(id).cloned())
  }

  async fn podcast_by_slug(&self, slug: &str) -> CastcartResult<Option<Podcast>> {
    self.online()?;
    Ok(self.tables.read().podcasts.iter().find(|p| p.slug == slug).cloned())
  }

  async fn insert_podcast(&self, podcast: &Podcast) -> CastcartResult<()> {
    self.online()?;
    let mut tables = self.tables.write();
    if tables.podcasts.iter().any(|p| p.slug == podcast.slug) {
      return Err(CastcartError::Conflict(format!("slug '{}' is already taken", podcast.slug)));
    }
    tables.podcasts.push(podcast.clone());
    Ok(())
  }

  async fn update_podcast(
    &self,
    id: Uuid,
    commission_rate: Option<Decimal>,
    is_active: Option<bool>,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Podcast>> {
    self.online()?;
    let mut tables = self.tables.write();
    let Some(podcast) = tables.podcasts.iter_mut().find(|p| p.id == id) else {
      return Ok(None);
    };
    if let Some(rate) = commission_rate {
      podcast.commission_rate = rate;
    }
    if let Some(active) = is_active {
      podcast.is_active = active;
    }
    podcast.updated_at = at;
    Ok(Some(podcast.clone()))
  }

  async fn list_products(&self, query: &ProductQuery) -> CastcartResult<Vec<ProductListing>> {
    self.online()?;
    let tables = self.tables.read();
    let owner = match &query.podcast {
      None => None,
      Some(PodcastRef::Id(id)) => Some(*id),
      Some(PodcastRef::Slug(slug)) => match tables.podcasts.iter().find(|p| &p.slug == slug) {
        Some(p) => Some(p.id),
        None => return Ok(Vec::new()),
      },
    };
    let matching: Vec<Product> = tables
      .products
      .iter()
      .filter(|p| p.is_active)
      .filter(|p| owner.map_or(true, |id| p.podcast_id == id))
      .filter(|p| query.category.as_ref().map_or(true, |c| &p.category == c))
      .cloned()
      .collect();
    Ok(
      newest_first(&matching, |p| p.created_at)
        .iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .map(|p| tables.listing(p))
        .collect(),
    )
  }

  async fn product_by_id(&self, id: Uuid) -> CastcartResult<Option<ProductListing>> {
    self.online()?;
    let tables = self.tables.read();
    Ok(tables.product(id).map(|p| tables.listing(p)))
  }

  async fn insert_product(&self, product: &Product) -> CastcartResult<()> {
    self.online()?;
    self.tables.write().products.push(product.clone());
    Ok(())
  }

  async fn set_product_active(&self, id: Uuid, is_active: bool, at: DateTime<Utc>) -> CastcartResult<Option<Product>> {
    self.online()?;
    let mut tables = self.tables.write();
    Ok(tables.products.iter_mut().find(|p| p.id == id).map(|p| {
      p.is_active = is_active;
      p.updated_at = at;
      p.clone()
    }))
  }

  async fn categories(&self) -> CastcartResult<Vec<String>> {
    self.online()?;
    let tables = self.tables.read();
    let set: BTreeSet<String> = tables
      .products
      .iter()
      .filter(|p| p.is_active)
      .map(|p| p.category.clone())
      .collect();
    Ok(set.into_iter().collect())
  }
}

#[async_trait]
impl ClickLog for MemoryStore {
  async fn append_click(&self, click: &AffiliateClick) -> CastcartResult<()> {
    self.online()?;
    self.tables.write().clicks.push(click.clone());
    Ok(())
  }

  async fn daily_clicks(&self, podcast_id: Uuid, window_days: u32) -> CastcartResult<Vec<DailyClicks>> {
    self.online()?;
    let tables = self.tables.read();
    let stamps = tables
      .clicks
      .iter()
      .filter(|c| c.podcast_id == podcast_id)
      .map(|c| c.clicked_at);
    Ok(bucket_clicks_by_day(stamps, window_days))
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, order: &Order) -> CastcartResult<()> {
    self.online()?;
    self.tables.write().orders.push(order.clone());
    Ok(())
  }

  async fn order_by_id(&self, id: Uuid) -> CastcartResult<Option<Order>> {
    self.online()?;
    Ok(self.tables.read().orders.iter().find(|o| o.id == id).cloned())
  }

  async fn update_order_status(
    &self,
    id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Order>> {
    self.online()?;
    let mut tables = self.tables.write();
    Ok(
      tables
        .orders
        .iter_mut()
        .find(|o| o.id == id && o.status == from)
        .map(|o| {
          o.status = to;
          o.updated_at = at;
          o.clone()
        }),
    )
  }

  async fn orders_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<OrderSummary>> {
    self.online()?;
    let tables = self.tables.read();
    let mine: Vec<Order> = tables
      .orders
      .iter()
      .filter(|o| o.user_id.as_ref() == Some(user_id))
      .cloned()
      .collect();
    Ok(
      newest_first(&mine, |o| o.created_at)
        .into_iter()
        .map(|o| OrderSummary {
          product: tables.product(o.product_id).map(|p| ProductBrief {
            id: p.id,
            name: p.name.clone(),
            images: p.images.clone(),
          }),
          podcast: tables.podcast(o.podcast_id).map(|p| PodcastBrief {
            id: p.id,
            name: p.name.clone(),
          }),
          id: o.id,
          quantity: o.quantity,
          price: o.price,
          commission: o.commission,
          status: o.status,
          created_at: o.created_at,
        })
        .collect(),
    )
  }

  async fn order_totals(&self, podcast_id: Uuid) -> CastcartResult<OrderTotals> {
    self.online()?;
    let tables = self.tables.read();
    tables
      .orders
      .iter()
      .filter(|o| o.podcast_id == podcast_id)
      .try_fold(OrderTotals::default(), |mut acc, o| {
        acc.count += 1;
        acc.revenue_sum = checked_sum(acc.revenue_sum, o.price)?;
        acc.commission_sum = checked_sum(acc.commission_sum, o.commission)?;
        Ok(acc)
      })
  }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
  async fn insert_favorite(&self, favorite: &Favorite) -> CastcartResult<Favorite> {
    self.online()?;
    let mut tables = self.tables.write();
    if let Some(existing) = tables
      .favorites
      .iter()
      .find(|f| f.user_id == favorite.user_id && f.product_id == favorite.product_id)
    {
      return Ok(existing.clone());
    }
    tables.favorites.push(favorite.clone());
    Ok(favorite.clone())
  }

  async fn delete_favorite(&self, user_id: &ActorId, product_id: Uuid) -> CastcartResult<bool> {
    self.online()?;
    let mut tables = self.tables.write();
    let before = tables.favorites.len();
    tables
      .favorites
      .retain(|f| !(&f.user_id == user_id && f.product_id == product_id));
    Ok(tables.favorites.len() < before)
  }

  async fn favorites_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<FavoriteEntry>> {
    self.online()?;
    let tables = self.tables.read();
    let mine: Vec<Favorite> = tables
      .favorites
      .iter()
      .filter(|f| &f.user_id == user_id)
      .cloned()
      .collect();
    Ok(
      newest_first(&mine, |f| f.created_at)
        .into_iter()
        .map(|f| FavoriteEntry {
          product: tables.product(f.product_id).map(Product::snapshot),
          product_id: f.product_id,
          created_at: f.created_at,
        })
        .collect(),
    )
  }
}

#[async_trait]
impl ReviewStore for MemoryStore {
  async fn append_review(&self, review: &Review) -> CastcartResult<()> {
    self.online()?;
    self.tables.write().reviews.push(review.clone());
    Ok(())
  }

  async fn reviews_for_product(&self, product_id: Uuid) -> CastcartResult<Vec<Review>> {
    self.online()?;
    let tables = self.tables.read();
    let rows: Vec<Review> = tables
      .reviews
      .iter()
      .filter(|r| r.product_id == product_id)
      .cloned()
      .collect();
    Ok(newest_first(&rows, |r| r.created_at))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw_order(podcast_id: Uuid, amount: Decimal) -> Order {
    let now = Utc::now();
    Order {
      id: Uuid::new_v4(),
      user_id: None,
      product_id: Uuid::new_v4(),
      podcast_id,
      quantity: 1,
      price: amount,
      commission: amount,
      status: OrderStatus::Pending,
      external_order_id: None,
      created_at: now,
      updated_at: now,
    }
  }

  #[tokio::test]
  async fn order_totals_report_overflow_instead_of_panicking() {
    let store = MemoryStore::new();
    let podcast_id = Uuid::new_v4();
    store.insert_order(&raw_order(podcast_id, Decimal::MAX)).await.unwrap();
    store.insert_order(&raw_order(podcast_id, Decimal::MAX)).await.unwrap();

    let err = store.order_totals(podcast_id).await.unwrap_err();
    assert!(err.is_store_unavailable());
  }
}
