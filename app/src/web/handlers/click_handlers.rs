// castcart/app/src/web/handlers/click_handlers.rs

use actix_web::{http::header, web, HttpResponse};
use castcart::command::parse_id;
use castcart::NewClick;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{MaybeUser, Provenance};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordClickPayload {
  pub product_id: String,
  pub podcast_id: String,
}

/// Records one outbound click. A store outage is not the storefront's
/// problem: the click is dropped and 202 `{tracked: false}` is returned.
#[instrument(
  name = "handler::record_click",
  skip(app_state, payload, user, provenance),
  fields(product_id = %payload.product_id, podcast_id = %payload.podcast_id)
)]
pub async fn record_click_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RecordClickPayload>,
  user: MaybeUser,
  provenance: Provenance,
) -> Result<HttpResponse, AppError> {
  let cmd = NewClick::parse(&payload.product_id, &payload.podcast_id)?;
  match app_state.services.recorder.record_click(cmd, user.actor(), provenance.0).await {
    Ok(click) => Ok(HttpResponse::Created().json(click)),
    Err(e) if e.is_store_unavailable() => {
      warn!(error = %e, "Click dropped: store unavailable.");
      Ok(HttpResponse::Accepted().json(json!({ "tracked": false })))
    }
    Err(e) => Err(e.into()),
  }
}

/// Outbound redirect to the product's affiliate URL. The click is recorded
/// against the product's owner on a best-effort basis; whatever happens to
/// that write, the redirect goes out.
#[instrument(name = "handler::outbound_redirect", skip(app_state, path, user, provenance), fields(product_id = %path.as_str()))]
pub async fn outbound_redirect_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  user: MaybeUser,
  provenance: Provenance,
) -> Result<HttpResponse, AppError> {
  let services = &app_state.services;
  let product_id = parse_id("productId", &path)?;
  let listing = services.catalog.product(product_id).await?;
  if !listing.product.is_active {
    return Err(AppError::NotFound(format!("product {} is no longer available", product_id)));
  }

  let cmd = NewClick {
    product_id,
    podcast_id: listing.product.podcast_id,
  };
  match services.recorder.record_click(cmd, user.actor(), provenance.0).await {
    Ok(click) => info!(click_id = %click.id, "Outbound click recorded."),
    Err(e) => warn!(error = %e, "Outbound click not recorded; redirecting anyway."),
  }

  Ok(
    HttpResponse::Found()
      .insert_header((header::LOCATION, listing.product.affiliate_url))
      .finish(),
  )
}
