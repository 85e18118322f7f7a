// castcart/core/src/service/catalog.rs

use crate::command::{NewPodcast, NewProduct, PodcastPatch, ProductQuery};
use crate::error::{CastcartError, CastcartResult};
use crate::model::{Podcast, Product, ProductListing};
use crate::store::CatalogStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Podcasts and their products. Records are soft-deactivated, never deleted,
/// so historical orders, clicks and reviews keep resolving.
pub struct Catalog {
  store: Arc<dyn CatalogStore>,
}

impl Catalog {
  pub fn new(store: Arc<dyn CatalogStore>) -> Self {
    Self { store }
  }

  pub async fn health(&self) -> CastcartResult<()> {
    self.store.ping().await
  }

  #[instrument(name = "catalog::list_podcasts", skip(self), err)]
  pub async fn list_podcasts(&self) -> CastcartResult<Vec<Podcast>> {
    self.store.list_active_podcasts().await
  }

  #[instrument(name = "catalog::podcast_by_slug", skip(self), err)]
  pub async fn podcast_by_slug(&self, slug: &str) -> CastcartResult<Podcast> {
    self
      .store
      .podcast_by_slug(slug)
      .await?
      .ok_or_else(|| CastcartError::not_found(format!("podcast '{}'", slug)))
  }

  #[instrument(name = "catalog::list_products", skip(self), err)]
  pub async fn list_products(&self, query: &ProductQuery) -> CastcartResult<Vec<ProductListing>> {
    self.store.list_products(query).await
  }

  #[instrument(name = "catalog::product", skip(self), err)]
  pub async fn product(&self, id: Uuid) -> CastcartResult<ProductListing> {
    self
      .store
      .product_by_id(id)
      .await?
      .ok_or_else(|| CastcartError::not_found(format!("product {}", id)))
  }

  pub async fn categories(&self) -> CastcartResult<Vec<String>> {
    self.store.categories().await
  }

  #[instrument(name = "catalog::create_podcast", skip(self, cmd), fields(slug = %cmd.slug), err)]
  pub async fn create_podcast(&self, cmd: NewPodcast) -> CastcartResult<Podcast> {
    let now = Utc::now();
    let podcast = Podcast {
      id: Uuid::new_v4(),
      name: cmd.name,
      slug: cmd.slug,
      description: cmd.description,
      logo: cmd.logo,
      category: cmd.category,
      host_name: cmd.host_name,
      listener_count: cmd.listener_count,
      is_active: true,
      commission_rate: cmd.commission_rate,
      partner_email: cmd.partner_email,
      created_at: now,
      updated_at: now,
    };
    self.store.insert_podcast(&podcast).await?;
    info!(podcast_id = %podcast.id, "Podcast created.");
    Ok(podcast)
  }

  /// Changes the rate and/or active flag. Existing orders keep the commission
  /// computed when they were written.
  #[instrument(name = "catalog::update_podcast", skip(self), err)]
  pub async fn update_podcast(&self, id: Uuid, patch: PodcastPatch) -> CastcartResult<Podcast> {
    let updated = self
      .store
      .update_podcast(id, patch.commission_rate, patch.is_active, Utc::now())
      .await?
      .ok_or_else(|| CastcartError::not_found(format!("podcast {}", id)))?;
    info!(rate = %updated.commission_rate, active = updated.is_active, "Podcast {} updated.", id);
    Ok(updated)
  }

  #[instrument(name = "catalog::create_product", skip(self, cmd), fields(podcast_id = %cmd.podcast_id), err)]
  pub async fn create_product(&self, cmd: NewProduct) -> CastcartResult<Product> {
    match self.store.podcast_by_id(cmd.podcast_id).await? {
      Some(owner) if owner.is_active => {}
      Some(_) => {
        warn!("Product rejected: podcast {} is inactive.", cmd.podcast_id);
        return Err(CastcartError::validation(format!("podcast {} is inactive", cmd.podcast_id)));
      }
      None => {
        warn!("Product rejected: podcast {} does not exist.", cmd.podcast_id);
        return Err(CastcartError::validation(format!("unknown podcast {}", cmd.podcast_id)));
      }
    }

    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name: cmd.name,
      description: cmd.description,
      price: cmd.price,
      images: cmd.images,
      category: cmd.category,
      sizes: cmd.sizes,
      colors: cmd.colors,
      inventory: cmd.inventory,
      podcast_id: cmd.podcast_id,
      affiliate_url: cmd.affiliate_url,
      is_active: true,
      created_at: now,
      updated_at: now,
    };
    self.store.insert_product(&product).await?;
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "catalog::set_product_active", skip(self), err)]
  pub async fn set_product_active(&self, id: Uuid, is_active: bool) -> CastcartResult<Product> {
    self
      .store
      .set_product_active(id, is_active, Utc::now())
      .await?
      .ok_or_else(|| CastcartError::not_found(format!("product {}", id)))
  }
}
