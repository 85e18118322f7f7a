// castcart/core/src/store/mod.rs

//! Persistence seams.
//!
//! Each service depends only on the traits it needs, held as
//! `Arc<dyn Trait>`. The application wires a PostgreSQL implementation;
//! [`MemoryStore`] implements every trait for tests and local runs.
//!
//! Implementations must provide atomic single-row inserts and updates, and
//! must enforce uniqueness of the favorite key `(user_id, product_id)` and of
//! the podcast slug. No other coordination is expected of them.

pub mod memory;

pub use memory::MemoryStore;

use crate::command::ProductQuery;
use crate::error::CastcartResult;
use crate::model::{
  ActorId, AffiliateClick, DailyClicks, Favorite, FavoriteEntry, Order, OrderStatus, OrderSummary, OrderTotals,
  Podcast, Product, ProductListing, Review,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
  /// Cheap round-trip used by health checks.
  async fn ping(&self) -> CastcartResult<()>;

  /// Active podcasts, newest first.
  async fn list_active_podcasts(&self) -> CastcartResult<Vec<Podcast>>;
  async fn podcast_by_id(&self, id: Uuid) -> CastcartResult<Option<Podcast>>;
  async fn podcast_by_slug(&self, slug: &str) -> CastcartResult<Option<Podcast>>;

  /// Fails with `Conflict` when the slug is taken.
  async fn insert_podcast(&self, podcast: &Podcast) -> CastcartResult<()>;
  /// Returns the updated row, `None` when the id is unknown.
  async fn update_podcast(
    &self,
    id: Uuid,
    commission_rate: Option<Decimal>,
    is_active: Option<bool>,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Podcast>>;

  /// Active products matching the query, newest first, with podcast summary.
  async fn list_products(&self, query: &ProductQuery) -> CastcartResult<Vec<ProductListing>>;
  /// Any product, active or not.
  async fn product_by_id(&self, id: Uuid) -> CastcartResult<Option<ProductListing>>;
  async fn insert_product(&self, product: &Product) -> CastcartResult<()>;
  async fn set_product_active(&self, id: Uuid, is_active: bool, at: DateTime<Utc>) -> CastcartResult<Option<Product>>;

  /// Distinct categories of active products, sorted.
  async fn categories(&self) -> CastcartResult<Vec<String>>;
}

#[async_trait]
pub trait ClickLog: Send + Sync + 'static {
  async fn append_click(&self, click: &AffiliateClick) -> CastcartResult<()>;

  /// Click counts per UTC day for a podcast, most recent first, limited to
  /// the `window_days` most recent days that have clicks.
  async fn daily_clicks(&self, podcast_id: Uuid, window_days: u32) -> CastcartResult<Vec<DailyClicks>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
  async fn insert_order(&self, order: &Order) -> CastcartResult<()>;
  async fn order_by_id(&self, id: Uuid) -> CastcartResult<Option<Order>>;

  /// Compare-and-set: moves the order to `to` only if its status is still
  /// `from`. `None` means no row matched (unknown id or the status moved).
  async fn update_order_status(
    &self,
    id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Order>>;

  /// Orders placed by one user, newest first.
  async fn orders_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<OrderSummary>>;

  /// Count and sums over every order of the podcast, whatever its status.
  async fn order_totals(&self, podcast_id: Uuid) -> CastcartResult<OrderTotals>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync + 'static {
  /// Inserts unless the key exists; returns the stored row either way.
  async fn insert_favorite(&self, favorite: &Favorite) -> CastcartResult<Favorite>;
  /// Returns whether a row was removed.
  async fn delete_favorite(&self, user_id: &ActorId, product_id: Uuid) -> CastcartResult<bool>;
  /// Newest first, joined with the product whatever its active flag.
  async fn favorites_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<FavoriteEntry>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync + 'static {
  async fn append_review(&self, review: &Review) -> CastcartResult<()>;
  /// Newest first.
  async fn reviews_for_product(&self, product_id: Uuid) -> CastcartResult<Vec<Review>>;
}

/// Convenience bound for backends that implement every seam.
pub trait Store: CatalogStore + ClickLog + OrderStore + FavoriteStore + ReviewStore {}

impl<T> Store for T where T: CatalogStore + ClickLog + OrderStore + FavoriteStore + ReviewStore {}
