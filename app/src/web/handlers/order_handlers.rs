// castcart/app/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use castcart::command::parse_id;
use castcart::{NewOrder, OrderStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, MaybeUser, OperatorUser};

/// A `commission` field, if sent, is ignored: the ledger always computes it.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
  #[serde(default)]
  pub product_id: String,
  #[serde(default)]
  pub podcast_id: String,
  pub quantity: Option<i32>,
  pub price: Decimal,
  pub external_order_id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusPayload {
  pub status: String,
}

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload, user),
  fields(product_id = %payload.product_id, podcast_id = %payload.podcast_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
  user: MaybeUser,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let cmd = NewOrder::parse(
    &payload.product_id,
    &payload.podcast_id,
    payload.quantity.unwrap_or(1),
    payload.price,
    payload.external_order_id,
  )?;
  let order = app_state.services.ledger.create_order(cmd, user.actor()).await?;
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.services.ledger.orders_for(Some(&auth_user.user_id)).await?;
  info!("Fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::update_order_status", skip(app_state, path, payload, operator), fields(order_id = %path.as_str(), operator = ?operator.user_id))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<UpdateOrderStatusPayload>,
  operator: OperatorUser,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_id("orderId", &path)?;
  let next = payload.status.parse::<OrderStatus>().map_err(AppError::Validation)?;
  let order = app_state.services.ledger.set_order_status(order_id, next).await?;
  Ok(HttpResponse::Ok().json(order))
}
