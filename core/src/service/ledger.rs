// castcart/core/src/service/ledger.rs

//! The commerce ledger: order creation with commission fixed at write time,
//! forward-only status transitions, and per-user order history.

use crate::command::{to_cents, NewOrder};
use crate::error::{CastcartError, CastcartResult};
use crate::model::{ActorId, Order, OrderStatus, OrderSummary};
use crate::service::require_actor;
use crate::settings::Settings;
use crate::store::{CatalogStore, OrderStore};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// `round(price * rate, 2)`, halves rounded away from zero.
pub fn compute_commission(price: Decimal, rate: Decimal) -> Decimal {
  to_cents((price * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

pub struct Ledger {
  catalog: Arc<dyn CatalogStore>,
  orders: Arc<dyn OrderStore>,
  settings: Settings,
}

impl Ledger {
  pub fn new(catalog: Arc<dyn CatalogStore>, orders: Arc<dyn OrderStore>, settings: Settings) -> Self {
    Self {
      catalog,
      orders,
      settings,
    }
  }

  /// Records a sale. Nothing links the order to an earlier click; attribution
  /// is implied by product, podcast and user.
  #[instrument(
    name = "ledger::create_order",
    skip(self, cmd),
    fields(product_id = %cmd.product_id, podcast_id = %cmd.podcast_id, quantity = cmd.quantity),
    err
  )]
  pub async fn create_order(&self, cmd: NewOrder, actor: Option<&ActorId>) -> CastcartResult<Order> {
    // Referential check
    if self.catalog.product_by_id(cmd.product_id).await?.is_none() {
      warn!("Order rejected: product {} does not exist.", cmd.product_id);
      return Err(CastcartError::validation(format!("unknown product {}", cmd.product_id)));
    }

    // Rate in force right now. A missing or inactive podcast never blocks a sale.
    let rate = match self.catalog.podcast_by_id(cmd.podcast_id).await? {
      Some(podcast) if podcast.is_active => podcast.commission_rate,
      Some(_) => {
        warn!("Podcast {} is inactive, applying default commission rate.", cmd.podcast_id);
        self.settings.default_commission_rate
      }
      None => {
        warn!("Podcast {} not found, applying default commission rate.", cmd.podcast_id);
        self.settings.default_commission_rate
      }
    };
    let commission = compute_commission(cmd.price, rate);
    debug!(%rate, %commission, "Commission computed.");

    let now = Utc::now();
    let order = Order {
      id: Uuid::new_v4(),
      user_id: actor.cloned(),
      product_id: cmd.product_id,
      podcast_id: cmd.podcast_id,
      quantity: cmd.quantity,
      price: cmd.price,
      commission,
      status: OrderStatus::Pending,
      external_order_id: cmd.external_order_id,
      created_at: now,
      updated_at: now,
    };
    self.orders.insert_order(&order).await?;

    info!(order_id = %order.id, price = %order.price, commission = %order.commission, "Order recorded.");
    Ok(order)
  }

  /// Moves an order forward. Allowed: pending -> fulfilled, pending -> cancelled,
  /// fulfilled -> refunded. Anything else is a validation error.
  #[instrument(name = "ledger::set_order_status", skip(self), err)]
  pub async fn set_order_status(&self, order_id: Uuid, next: OrderStatus) -> CastcartResult<Order> {
    let current = self
      .orders
      .order_by_id(order_id)
      .await?
      .ok_or_else(|| CastcartError::not_found(format!("order {}", order_id)))?;

    if !current.status.can_transition_to(next) {
      warn!("Rejected status change {} -> {} for order {}.", current.status, next, order_id);
      return Err(CastcartError::validation(format!(
        "cannot change order status from {} to {}",
        current.status, next
      )));
    }

    match self
      .orders
      .update_order_status(order_id, current.status, next, Utc::now())
      .await?
    {
      Some(updated) => {
        info!("Order {} moved {} -> {}.", order_id, current.status, next);
        Ok(updated)
      }
      None => {
        warn!("Order {} changed status concurrently; {} not applied.", order_id, next);
        Err(CastcartError::Conflict(format!(
          "order {} was modified concurrently, reload and retry",
          order_id
        )))
      }
    }
  }

  #[instrument(name = "ledger::orders_for", skip(self), err)]
  pub async fn orders_for(&self, actor: Option<&ActorId>) -> CastcartResult<Vec<OrderSummary>> {
    let actor = require_actor(actor)?;
    self.orders.orders_for_user(actor).await
  }
}
