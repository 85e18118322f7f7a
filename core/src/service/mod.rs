// castcart/core/src/service/mod.rs

//! Services own the rules; stores only persist.

pub mod analytics;
pub mod catalog;
pub mod favorites;
pub mod ledger;
pub mod recorder;
pub mod reviews;

pub use analytics::Aggregator;
pub use catalog::Catalog;
pub use favorites::FavoritesIndex;
pub use ledger::Ledger;
pub use recorder::Recorder;
pub use reviews::Reviews;

use crate::error::{CastcartError, CastcartResult};
use crate::model::ActorId;
use crate::settings::Settings;
use crate::store::{CatalogStore, ClickLog, FavoriteStore, OrderStore, ReviewStore, Store};
use std::sync::Arc;

/// Identity-scoped operations call this first.
pub(crate) fn require_actor(actor: Option<&ActorId>) -> CastcartResult<&ActorId> {
  actor.ok_or(CastcartError::AuthRequired)
}

/// Every service wired against one backend.
pub struct Services {
  pub catalog: Catalog,
  pub recorder: Recorder,
  pub ledger: Ledger,
  pub favorites: FavoritesIndex,
  pub reviews: Reviews,
  pub analytics: Aggregator,
  pub settings: Settings,
}

impl Services {
  pub fn new<S: Store>(store: Arc<S>, settings: Settings) -> Self {
    let catalog: Arc<dyn CatalogStore> = store.clone();
    let clicks: Arc<dyn ClickLog> = store.clone();
    let orders: Arc<dyn OrderStore> = store.clone();
    let favorites: Arc<dyn FavoriteStore> = store.clone();
    let reviews: Arc<dyn ReviewStore> = store;

    Self {
      catalog: Catalog::new(catalog.clone()),
      recorder: Recorder::new(catalog.clone(), clicks.clone()),
      ledger: Ledger::new(catalog.clone(), orders.clone(), settings.clone()),
      favorites: FavoritesIndex::new(catalog.clone(), favorites),
      reviews: Reviews::new(catalog, reviews),
      analytics: Aggregator::new(clicks, orders, settings.clone()),
      settings,
    }
  }
}
