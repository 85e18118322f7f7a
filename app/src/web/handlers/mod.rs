// castcart/app/src/web/handlers/mod.rs

pub mod analytics_handlers;
pub mod catalog_handlers;
pub mod click_handlers;
pub mod favorite_handlers;
pub mod health_handlers;
pub mod order_handlers;
pub mod review_handlers;
