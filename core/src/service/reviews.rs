// castcart/core/src/service/reviews.rs

use crate::command::NewReview;
use crate::error::{CastcartError, CastcartResult};
use crate::model::{ActorId, Review};
use crate::service::require_actor;
use crate::store::{CatalogStore, ReviewStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct Reviews {
  catalog: Arc<dyn CatalogStore>,
  reviews: Arc<dyn ReviewStore>,
}

impl Reviews {
  pub fn new(catalog: Arc<dyn CatalogStore>, reviews: Arc<dyn ReviewStore>) -> Self {
    Self { catalog, reviews }
  }

  #[instrument(name = "reviews::create", skip(self, cmd), fields(product_id = %cmd.product_id, rating = cmd.rating), err)]
  pub async fn create(&self, actor: Option<&ActorId>, cmd: NewReview) -> CastcartResult<Review> {
    let user_id = require_actor(actor)?;
    if self.catalog.product_by_id(cmd.product_id).await?.is_none() {
      return Err(CastcartError::validation(format!("unknown product {}", cmd.product_id)));
    }
    let review = Review {
      id: Uuid::new_v4(),
      user_id: user_id.clone(),
      product_id: cmd.product_id,
      rating: cmd.rating,
      comment: cmd.comment,
      created_at: Utc::now(),
    };
    self.reviews.append_review(&review).await?;
    info!(review_id = %review.id, "Review recorded.");
    Ok(review)
  }

  #[instrument(name = "reviews::for_product", skip(self), err)]
  pub async fn for_product(&self, product_id: Uuid) -> CastcartResult<Vec<Review>> {
    if self.catalog.product_by_id(product_id).await?.is_none() {
      return Err(CastcartError::not_found(format!("product {}", product_id)));
    }
    self.reviews.reviews_for_product(product_id).await
  }
}
