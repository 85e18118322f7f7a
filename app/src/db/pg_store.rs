// castcart/app/src/db/pg_store.rs

//! PostgreSQL implementation of the castcart store traits, using runtime
//! `sqlx::query_as` and `FromRow` row structs.

use async_trait::async_trait;
use castcart::command::{PodcastRef, ProductQuery};
use castcart::model::{
  ActorId, AffiliateClick, DailyClicks, Favorite, FavoriteEntry, Order, OrderStatus, OrderSummary, OrderTotals,
  Podcast, PodcastBrief, PodcastSummary, Product, ProductBrief, ProductListing, ProductSnapshot, Review,
};
use castcart::store::{CatalogStore, ClickLog, FavoriteStore, OrderStore, ReviewStore};
use castcart::{CastcartError, CastcartResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

const PODCAST_COLUMNS: &str = "id, name, slug, description, logo, category, host_name, listener_count, is_active, \
   commission_rate, partner_email, created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, name, description, price, images, category, sizes, colors, inventory, \
   podcast_id, affiliate_url, is_active, created_at, updated_at";

const LISTING_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, p.images, p.category, p.sizes, \
   p.colors, p.inventory, p.podcast_id, p.affiliate_url, p.is_active, p.created_at, p.updated_at, \
   pc.id AS owner_id, pc.name AS owner_name, pc.slug AS owner_slug, pc.logo AS owner_logo \
   FROM products p LEFT JOIN podcasts pc ON pc.id = p.podcast_id";

const ORDER_COLUMNS: &str = "id, user_id, product_id, podcast_id, quantity, price, commission, status, \
   external_order_id, created_at, updated_at";

/// Logs the failure and wraps it as `StoreUnavailable`.
fn store_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CastcartError {
  move |e| {
    error!(operation, error = %e, "Database operation failed.");
    CastcartError::store(e)
  }
}

#[derive(Debug, FromRow)]
struct PodcastRow {
  id: Uuid,
  name: String,
  slug: String,
  description: Option<String>,
  logo: Option<String>,
  category: String,
  host_name: String,
  listener_count: Option<i32>,
  is_active: bool,
  commission_rate: Decimal,
  partner_email: String,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<PodcastRow> for Podcast {
  fn from(row: PodcastRow) -> Self {
    Podcast {
      id: row.id,
      name: row.name,
      slug: row.slug,
      description: row.description,
      logo: row.logo,
      category: row.category,
      host_name: row.host_name,
      listener_count: row.listener_count,
      is_active: row.is_active,
      commission_rate: row.commission_rate,
      partner_email: row.partner_email,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  name: String,
  description: Option<String>,
  price: Decimal,
  images: Vec<String>,
  category: String,
  sizes: Vec<String>,
  colors: Vec<String>,
  inventory: i32,
  podcast_id: Uuid,
  affiliate_url: String,
  is_active: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      description: row.description,
      price: row.price,
      images: row.images,
      category: row.category,
      sizes: row.sizes.into_iter().collect(),
      colors: row.colors.into_iter().collect(),
      inventory: row.inventory,
      podcast_id: row.podcast_id,
      affiliate_url: row.affiliate_url,
      is_active: row.is_active,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

/// A product row left-joined with its owner's summary columns.
#[derive(Debug, FromRow)]
struct ListingRow {
  #[sqlx(flatten)]
  product: ProductRow,
  owner_id: Option<Uuid>,
  owner_name: Option<String>,
  owner_slug: Option<String>,
  owner_logo: Option<String>,
}

impl From<ListingRow> for ProductListing {
  fn from(row: ListingRow) -> Self {
    let podcast = match (row.owner_id, row.owner_name, row.owner_slug) {
      (Some(id), Some(name), Some(slug)) => Some(PodcastSummary {
        id,
        name,
        slug,
        logo: row.owner_logo,
      }),
      _ => None,
    };
    ProductListing {
      product: row.product.into(),
      podcast,
    }
  }
}

#[derive(Debug, FromRow)]
struct DayRow {
  day: NaiveDate,
  total: i64,
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  user_id: Option<String>,
  product_id: Uuid,
  podcast_id: Uuid,
  quantity: i32,
  price: Decimal,
  commission: Decimal,
  status: String,
  external_order_id: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

fn parse_status(raw: &str) -> CastcartResult<OrderStatus> {
  raw.parse::<OrderStatus>().map_err(|e| {
    error!(status = raw, "Unreadable order status in database.");
    CastcartError::store(anyhow::anyhow!(e))
  })
}

impl TryFrom<OrderRow> for Order {
  type Error = CastcartError;

  fn try_from(row: OrderRow) -> CastcartResult<Self> {
    Ok(Order {
      status: parse_status(&row.status)?,
      id: row.id,
      user_id: row.user_id.map(ActorId::from),
      product_id: row.product_id,
      podcast_id: row.podcast_id,
      quantity: row.quantity,
      price: row.price,
      commission: row.commission,
      external_order_id: row.external_order_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[derive(Debug, FromRow)]
struct OrderSummaryRow {
  id: Uuid,
  quantity: i32,
  price: Decimal,
  commission: Decimal,
  status: String,
  created_at: DateTime<Utc>,
  product_ref_id: Option<Uuid>,
  product_name: Option<String>,
  product_images: Option<Vec<String>>,
  podcast_ref_id: Option<Uuid>,
  podcast_name: Option<String>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
  type Error = CastcartError;

  fn try_from(row: OrderSummaryRow) -> CastcartResult<Self> {
    let product = match (row.product_ref_id, row.product_name) {
      (Some(id), Some(name)) => Some(ProductBrief {
        id,
        name,
        images: row.product_images.unwrap_or_default(),
      }),
      _ => None,
    };
    let podcast = match (row.podcast_ref_id, row.podcast_name) {
      (Some(id), Some(name)) => Some(PodcastBrief { id, name }),
      _ => None,
    };
    Ok(OrderSummary {
      status: parse_status(&row.status)?,
      id: row.id,
      quantity: row.quantity,
      price: row.price,
      commission: row.commission,
      created_at: row.created_at,
      product,
      podcast,
    })
  }
}

#[derive(Debug, FromRow)]
struct TotalsRow {
  total: i64,
  revenue: Decimal,
  commission: Decimal,
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
  user_id: String,
  product_id: Uuid,
  created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for Favorite {
  fn from(row: FavoriteRow) -> Self {
    Favorite {
      user_id: ActorId::from(row.user_id),
      product_id: row.product_id,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
struct FavoriteEntryRow {
  product_id: Uuid,
  created_at: DateTime<Utc>,
  product_name: Option<String>,
  product_price: Option<Decimal>,
  product_images: Option<Vec<String>>,
  product_category: Option<String>,
}

impl From<FavoriteEntryRow> for FavoriteEntry {
  fn from(row: FavoriteEntryRow) -> Self {
    let product = match (row.product_name, row.product_price, row.product_category) {
      (Some(name), Some(price), Some(category)) => Some(ProductSnapshot {
        id: row.product_id,
        name,
        price,
        images: row.product_images.unwrap_or_default(),
        category,
      }),
      _ => None,
    };
    FavoriteEntry {
      product_id: row.product_id,
      created_at: row.created_at,
      product,
    }
  }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
  id: Uuid,
  user_id: String,
  product_id: Uuid,
  rating: i32,
  comment: Option<String>,
  created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
  fn from(row: ReviewRow) -> Self {
    Review {
      id: row.id,
      user_id: ActorId::from(row.user_id),
      product_id: row.product_id,
      rating: row.rating,
      comment: row.comment,
      created_at: row.created_at,
    }
  }
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn ping(&self) -> CastcartResult<()> {
    sqlx::query("SELECT 1")
      .execute(&self.pool)
      .await
      .map_err(store_err("ping"))?;
    Ok(())
  }

  async fn list_active_podcasts(&self) -> CastcartResult<Vec<Podcast>> {
    let rows: Vec<PodcastRow> = sqlx::query_as(&format!(
      "SELECT {} FROM podcasts WHERE is_active ORDER BY created_at DESC",
      PODCAST_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("list_active_podcasts"))?;
    Ok(rows.into_iter().map(Podcast::from).collect())
  }

  async fn podcast_by_id(&self, id: Uuid) -> CastcartResult<Option<Podcast>> {
    let row: Option<PodcastRow> = sqlx::query_as(&format!("SELECT {} FROM podcasts WHERE id = $1", PODCAST_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("podcast_by_id"))?;
    Ok(row.map(Podcast::from))
  }

  async fn podcast_by_slug(&self, slug: &str) -> CastcartResult<Option<Podcast>> {
    let row: Option<PodcastRow> = sqlx::query_as(&format!("SELECT {} FROM podcasts WHERE slug = $1", PODCAST_COLUMNS))
      .bind(slug)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("podcast_by_slug"))?;
    Ok(row.map(Podcast::from))
  }

  async fn insert_podcast(&self, podcast: &Podcast) -> CastcartResult<()> {
    let result = sqlx::query(&format!(
      "INSERT INTO podcasts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
      PODCAST_COLUMNS
    ))
    .bind(podcast.id)
    .bind(&podcast.name)
    .bind(&podcast.slug)
    .bind(&podcast.description)
    .bind(&podcast.logo)
    .bind(&podcast.category)
    .bind(&podcast.host_name)
    .bind(podcast.listener_count)
    .bind(podcast.is_active)
    .bind(podcast.commission_rate)
    .bind(&podcast.partner_email)
    .bind(podcast.created_at)
    .bind(podcast.updated_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(CastcartError::Conflict(format!(
        "slug '{}' is already taken",
        podcast.slug
      ))),
      Err(e) => Err(store_err("insert_podcast")(e)),
    }
  }

  async fn update_podcast(
    &self,
    id: Uuid,
    commission_rate: Option<Decimal>,
    is_active: Option<bool>,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Podcast>> {
    let row: Option<PodcastRow> = sqlx::query_as(&format!(
      "UPDATE podcasts SET commission_rate = COALESCE($2, commission_rate), is_active = COALESCE($3, is_active), \
       updated_at = $4 WHERE id = $1 RETURNING {}",
      PODCAST_COLUMNS
    ))
    .bind(id)
    .bind(commission_rate)
    .bind(is_active)
    .bind(at)
    .fetch_optional(&self.pool)
    .await
    .map_err(store_err("update_podcast"))?;
    Ok(row.map(Podcast::from))
  }

  async fn list_products(&self, query: &ProductQuery) -> CastcartResult<Vec<ProductListing>> {
    let (owner_id, owner_slug) = match &query.podcast {
      None => (None, None),
      Some(PodcastRef::Id(id)) => (Some(*id), None),
      Some(PodcastRef::Slug(slug)) => (None, Some(slug.as_str())),
    };
    let rows: Vec<ListingRow> = sqlx::query_as(&format!(
      "{} WHERE p.is_active \
       AND ($1::uuid IS NULL OR p.podcast_id = $1) \
       AND ($2::text IS NULL OR pc.slug = $2) \
       AND ($3::text IS NULL OR p.category = $3) \
       ORDER BY p.created_at DESC LIMIT $4 OFFSET $5",
      LISTING_SELECT
    ))
    .bind(owner_id)
    .bind(owner_slug)
    .bind(query.category.as_deref())
    .bind(query.limit)
    .bind(query.offset)
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("list_products"))?;
    Ok(rows.into_iter().map(ProductListing::from).collect())
  }

  async fn product_by_id(&self, id: Uuid) -> CastcartResult<Option<ProductListing>> {
    let row: Option<ListingRow> = sqlx::query_as(&format!("{} WHERE p.id = $1", LISTING_SELECT))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("product_by_id"))?;
    Ok(row.map(ProductListing::from))
  }

  async fn insert_product(&self, product: &Product) -> CastcartResult<()> {
    sqlx::query(&format!(
      "INSERT INTO products ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(&product.images)
    .bind(&product.category)
    .bind(product.sizes.iter().cloned().collect::<Vec<String>>())
    .bind(product.colors.iter().cloned().collect::<Vec<String>>())
    .bind(product.inventory)
    .bind(product.podcast_id)
    .bind(&product.affiliate_url)
    .bind(product.is_active)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("insert_product"))?;
    Ok(())
  }

  async fn set_product_active(&self, id: Uuid, is_active: bool, at: DateTime<Utc>) -> CastcartResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!(
      "UPDATE products SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(is_active)
    .bind(at)
    .fetch_optional(&self.pool)
    .await
    .map_err(store_err("set_product_active"))?;
    Ok(row.map(Product::from))
  }

  async fn categories(&self) -> CastcartResult<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM products WHERE is_active ORDER BY category")
      .fetch_all(&self.pool)
      .await
      .map_err(store_err("categories"))
  }
}

#[async_trait]
impl ClickLog for PgStore {
  async fn append_click(&self, click: &AffiliateClick) -> CastcartResult<()> {
    sqlx::query(
      "INSERT INTO affiliate_clicks (id, user_id, product_id, podcast_id, ip_address, user_agent, referrer, clicked_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(click.id)
    .bind(click.user_id.as_ref().map(ActorId::as_str))
    .bind(click.product_id)
    .bind(click.podcast_id)
    .bind(&click.ip_address)
    .bind(&click.user_agent)
    .bind(&click.referrer)
    .bind(click.clicked_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("append_click"))?;
    Ok(())
  }

  async fn daily_clicks(&self, podcast_id: Uuid, window_days: u32) -> CastcartResult<Vec<DailyClicks>> {
    let rows: Vec<DayRow> = sqlx::query_as(
      "SELECT (clicked_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS total \
       FROM affiliate_clicks WHERE podcast_id = $1 \
       GROUP BY day ORDER BY day DESC LIMIT $2",
    )
    .bind(podcast_id)
    .bind(i64::from(window_days))
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("daily_clicks"))?;
    Ok(
      rows
        .into_iter()
        .map(|r| DailyClicks {
          date: r.day,
          total: r.total,
        })
        .collect(),
    )
  }
}

#[async_trait]
impl OrderStore for PgStore {
  async fn insert_order(&self, order: &Order) -> CastcartResult<()> {
    sqlx::query(&format!(
      "INSERT INTO orders ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
      ORDER_COLUMNS
    ))
    .bind(order.id)
    .bind(order.user_id.as_ref().map(ActorId::as_str))
    .bind(order.product_id)
    .bind(order.podcast_id)
    .bind(order.quantity)
    .bind(order.price)
    .bind(order.commission)
    .bind(order.status.as_str())
    .bind(&order.external_order_id)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("insert_order"))?;
    Ok(())
  }

  async fn order_by_id(&self, id: Uuid) -> CastcartResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(store_err("order_by_id"))?;
    row.map(Order::try_from).transpose()
  }

  async fn update_order_status(
    &self,
    id: Uuid,
    from: OrderStatus,
    to: OrderStatus,
    at: DateTime<Utc>,
  ) -> CastcartResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "UPDATE orders SET status = $3, updated_at = $4 WHERE id = $1 AND status = $2 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .bind(at)
    .fetch_optional(&self.pool)
    .await
    .map_err(store_err("update_order_status"))?;
    row.map(Order::try_from).transpose()
  }

  async fn orders_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<OrderSummary>> {
    let rows: Vec<OrderSummaryRow> = sqlx::query_as(
      "SELECT o.id, o.quantity, o.price, o.commission, o.status, o.created_at, \
       p.id AS product_ref_id, p.name AS product_name, p.images AS product_images, \
       pc.id AS podcast_ref_id, pc.name AS podcast_name \
       FROM orders o \
       LEFT JOIN products p ON p.id = o.product_id \
       LEFT JOIN podcasts pc ON pc.id = o.podcast_id \
       WHERE o.user_id = $1 ORDER BY o.created_at DESC",
    )
    .bind(user_id.as_str())
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("orders_for_user"))?;
    rows.into_iter().map(OrderSummary::try_from).collect()
  }

  async fn order_totals(&self, podcast_id: Uuid) -> CastcartResult<OrderTotals> {
    let row: TotalsRow = sqlx::query_as(
      "SELECT COUNT(*) AS total, COALESCE(SUM(price), 0) AS revenue, COALESCE(SUM(commission), 0) AS commission \
       FROM orders WHERE podcast_id = $1",
    )
    .bind(podcast_id)
    .fetch_one(&self.pool)
    .await
    .map_err(store_err("order_totals"))?;
    Ok(OrderTotals {
      count: row.total,
      revenue_sum: row.revenue,
      commission_sum: row.commission,
    })
  }
}

#[async_trait]
impl FavoriteStore for PgStore {
  async fn insert_favorite(&self, favorite: &Favorite) -> CastcartResult<Favorite> {
    // A concurrent add of the same key is absorbed by ON CONFLICT.
    sqlx::query(
      "INSERT INTO favorites (user_id, product_id, created_at) VALUES ($1, $2, $3) \
       ON CONFLICT (user_id, product_id) DO NOTHING",
    )
    .bind(favorite.user_id.as_str())
    .bind(favorite.product_id)
    .bind(favorite.created_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("insert_favorite"))?;

    let stored: Option<FavoriteRow> =
      sqlx::query_as("SELECT user_id, product_id, created_at FROM favorites WHERE user_id = $1 AND product_id = $2")
        .bind(favorite.user_id.as_str())
        .bind(favorite.product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("insert_favorite"))?;
    // A remove may win the race between the two statements; the add still succeeded.
    Ok(stored.map(Favorite::from).unwrap_or_else(|| favorite.clone()))
  }

  async fn delete_favorite(&self, user_id: &ActorId, product_id: Uuid) -> CastcartResult<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
      .bind(user_id.as_str())
      .bind(product_id)
      .execute(&self.pool)
      .await
      .map_err(store_err("delete_favorite"))?;
    Ok(result.rows_affected() > 0)
  }

  async fn favorites_for_user(&self, user_id: &ActorId) -> CastcartResult<Vec<FavoriteEntry>> {
    let rows: Vec<FavoriteEntryRow> = sqlx::query_as(
      "SELECT f.product_id, f.created_at, p.name AS product_name, p.price AS product_price, \
       p.images AS product_images, p.category AS product_category \
       FROM favorites f LEFT JOIN products p ON p.id = f.product_id \
       WHERE f.user_id = $1 ORDER BY f.created_at DESC",
    )
    .bind(user_id.as_str())
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("favorites_for_user"))?;
    Ok(rows.into_iter().map(FavoriteEntry::from).collect())
  }
}

#[async_trait]
impl ReviewStore for PgStore {
  async fn append_review(&self, review: &Review) -> CastcartResult<()> {
    sqlx::query(
      "INSERT INTO reviews (id, user_id, product_id, rating, comment, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(review.id)
    .bind(review.user_id.as_str())
    .bind(review.product_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.created_at)
    .execute(&self.pool)
    .await
    .map_err(store_err("append_review"))?;
    Ok(())
  }

  async fn reviews_for_product(&self, product_id: Uuid) -> CastcartResult<Vec<Review>> {
    let rows: Vec<ReviewRow> = sqlx::query_as(
      "SELECT id, user_id, product_id, rating, comment, created_at FROM reviews \
       WHERE product_id = $1 ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(&self.pool)
    .await
    .map_err(store_err("reviews_for_product"))?;
    Ok(rows.into_iter().map(Review::from).collect())
  }
}
