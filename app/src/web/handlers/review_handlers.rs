// castcart/app/src/web/handlers/review_handlers.rs

use actix_web::{web, HttpResponse};
use castcart::command::parse_id;
use castcart::NewReview;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewPayload {
  #[serde(default)]
  pub product_id: String,
  pub rating: i32,
  pub comment: Option<String>,
}

#[instrument(name = "handler::list_reviews", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn list_reviews_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id("productId", &path)?;
  let reviews = app_state.services.reviews.for_product(product_id).await?;
  Ok(HttpResponse::Ok().json(reviews))
}

#[instrument(
  name = "handler::create_review",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %payload.product_id, rating = payload.rating)
)]
pub async fn create_review_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateReviewPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let cmd = NewReview::parse(&payload.product_id, payload.rating, payload.comment)?;
  let review = app_state.services.reviews.create(Some(&auth_user.user_id), cmd).await?;
  Ok(HttpResponse::Created().json(review))
}
