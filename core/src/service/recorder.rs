// castcart/core/src/service/recorder.rs

use crate::command::NewClick;
use crate::error::{CastcartError, CastcartResult};
use crate::model::{ActorId, AffiliateClick, RequestProvenance};
use crate::store::{CatalogStore, ClickLog};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Append-only log of outbound affiliate clicks.
///
/// The product must exist, but whether it belongs to the podcast named in
/// the click is deliberately not checked: the caller supplies both ids as
/// seen at click time.
pub struct Recorder {
  catalog: Arc<dyn CatalogStore>,
  clicks: Arc<dyn ClickLog>,
}

impl Recorder {
  pub fn new(catalog: Arc<dyn CatalogStore>, clicks: Arc<dyn ClickLog>) -> Self {
    Self { catalog, clicks }
  }

  #[instrument(
    name = "recorder::record_click",
    skip(self, cmd, provenance),
    fields(product_id = %cmd.product_id, podcast_id = %cmd.podcast_id),
    err
  )]
  pub async fn record_click(
    &self,
    cmd: NewClick,
    actor: Option<&ActorId>,
    provenance: RequestProvenance,
  ) -> CastcartResult<AffiliateClick> {
    let product = self.catalog.product_by_id(cmd.product_id).await?.ok_or_else(|| {
      warn!("Click rejected: product {} does not exist.", cmd.product_id);
      CastcartError::validation(format!("unknown product {}", cmd.product_id))
    })?;
    if product.product.podcast_id != cmd.podcast_id {
      debug!(
        owner = %product.product.podcast_id,
        "Click attributed to a podcast other than the product's current owner."
      );
    }

    let provenance = provenance.normalized();
    let click = AffiliateClick {
      id: Uuid::new_v4(),
      user_id: actor.cloned(),
      product_id: cmd.product_id,
      podcast_id: cmd.podcast_id,
      ip_address: provenance.ip_address,
      user_agent: provenance.user_agent,
      referrer: provenance.referrer,
      clicked_at: Utc::now(),
    };

    if let Err(e) = self.clicks.append_click(&click).await {
      error!("Failed to persist click for product {}: {}", cmd.product_id, e);
      return Err(e);
    }
    info!(click_id = %click.id, anonymous = actor.is_none(), "Affiliate click recorded.");
    Ok(click)
  }
}
