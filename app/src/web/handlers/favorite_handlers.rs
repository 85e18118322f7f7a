// castcart/app/src/web/handlers/favorite_handlers.rs

use actix_web::{web, HttpResponse};
use castcart::command::parse_id;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AddFavoritePayload {
  pub product_id: String,
}

#[instrument(name = "handler::list_favorites", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_favorites_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let favorites = app_state.services.favorites.list(Some(&auth_user.user_id)).await?;
  Ok(HttpResponse::Ok().json(favorites))
}

#[instrument(
  name = "handler::add_favorite",
  skip(app_state, payload, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %payload.product_id)
)]
pub async fn add_favorite_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddFavoritePayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id("productId", &payload.product_id)?;
  let favorite = app_state
    .services
    .favorites
    .add(Some(&auth_user.user_id), product_id)
    .await?;
  Ok(HttpResponse::Created().json(favorite))
}

#[instrument(
  name = "handler::remove_favorite",
  skip(app_state, path, auth_user),
  fields(user_id = %auth_user.user_id, product_id = %path.as_str())
)]
pub async fn remove_favorite_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id("productId", &path)?;
  app_state
    .services
    .favorites
    .remove(Some(&auth_user.user_id), product_id)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Favorite removed successfully" })))
}
