// castcart/app/src/web/handlers/analytics_handlers.rs

use actix_web::{web, HttpResponse};
use castcart::command::parse_id;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct AnalyticsQuery {
  pub days: Option<u32>,
}

#[instrument(name = "handler::podcast_analytics", skip(app_state, path, query), fields(podcast_id = %path.as_str(), days = ?query.days))]
pub async fn podcast_analytics_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<AnalyticsQuery>,
) -> Result<HttpResponse, AppError> {
  let podcast_id = parse_id("podcastId", &path)?;
  let analytics = app_state
    .services
    .analytics
    .podcast_analytics(podcast_id, query.days)
    .await?;
  Ok(HttpResponse::Ok().json(analytics))
}
