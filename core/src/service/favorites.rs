// castcart/core/src/service/favorites.rs

use crate::error::{CastcartError, CastcartResult};
use crate::model::{ActorId, Favorite, FavoriteEntry};
use crate::service::require_actor;
use crate::store::{CatalogStore, FavoriteStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Set of (user, product) pairs. Add and remove both succeed whatever the
/// prior state; the store's unique key is the only serialization point.
pub struct FavoritesIndex {
  catalog: Arc<dyn CatalogStore>,
  favorites: Arc<dyn FavoriteStore>,
}

impl FavoritesIndex {
  pub fn new(catalog: Arc<dyn CatalogStore>, favorites: Arc<dyn FavoriteStore>) -> Self {
    Self { catalog, favorites }
  }

  /// Returns the stored row; on a repeat add that is the original row.
  #[instrument(name = "favorites::add", skip(self), err)]
  pub async fn add(&self, actor: Option<&ActorId>, product_id: Uuid) -> CastcartResult<Favorite> {
    let user_id = require_actor(actor)?;
    if self.catalog.product_by_id(product_id).await?.is_none() {
      warn!("Favorite rejected: product {} does not exist.", product_id);
      return Err(CastcartError::validation(format!("unknown product {}", product_id)));
    }

    let stored = self
      .favorites
      .insert_favorite(&Favorite {
        user_id: user_id.clone(),
        product_id,
        created_at: Utc::now(),
      })
      .await?;
    info!("Product {} is a favorite of {}.", product_id, user_id);
    Ok(stored)
  }

  #[instrument(name = "favorites::remove", skip(self), err)]
  pub async fn remove(&self, actor: Option<&ActorId>, product_id: Uuid) -> CastcartResult<()> {
    let user_id = require_actor(actor)?;
    let removed = self.favorites.delete_favorite(user_id, product_id).await?;
    if removed {
      info!("Favorite {} removed for {}.", product_id, user_id);
    } else {
      debug!("Favorite {} was not present for {}.", product_id, user_id);
    }
    Ok(())
  }

  #[instrument(name = "favorites::list", skip(self), err)]
  pub async fn list(&self, actor: Option<&ActorId>) -> CastcartResult<Vec<FavoriteEntry>> {
    let user_id = require_actor(actor)?;
    self.favorites.favorites_for_user(user_id).await
  }
}
