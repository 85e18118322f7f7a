// castcart/app/src/web/routes.rs

use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{
  analytics_handlers, catalog_handlers, click_handlers, favorite_handlers, health_handlers, order_handlers,
  review_handlers,
};

// Malformed bodies, query strings and path segments answer with the same
// 400 `{error}` shape as every other validation failure.
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid query string: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid path: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error))
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error))
    .service(
      web::scope("/api")
        .route("/health", web::get().to(health_handlers::health_check_handler))
        .route("/categories", web::get().to(catalog_handlers::list_categories_handler))
        // Podcasts
        .service(
          web::scope("/podcasts")
            .route("", web::get().to(catalog_handlers::list_podcasts_handler))
            .route("", web::post().to(catalog_handlers::create_podcast_handler))
            .route("/{slug}", web::get().to(catalog_handlers::get_podcast_handler))
            .route("/{podcast_id}", web::patch().to(catalog_handlers::update_podcast_handler)),
        )
        // Products
        .service(
          web::scope("/products")
            .route("", web::get().to(catalog_handlers::list_products_handler))
            .route("", web::post().to(catalog_handlers::create_product_handler))
            .route("/{product_id}", web::get().to(catalog_handlers::get_product_handler))
            .route("/{product_id}", web::patch().to(catalog_handlers::update_product_handler))
            .route("/{product_id}/reviews", web::get().to(review_handlers::list_reviews_handler)),
        )
        // Attribution
        .route("/clicks", web::post().to(click_handlers::record_click_handler))
        .route("/go/{product_id}", web::get().to(click_handlers::outbound_redirect_handler))
        // Orders
        .service(
          web::scope("/orders")
            .route("", web::get().to(order_handlers::list_orders_handler))
            .route("", web::post().to(order_handlers::create_order_handler))
            .route("/{order_id}/status", web::patch().to(order_handlers::update_order_status_handler)),
        )
        // Favorites
        .service(
          web::scope("/favorites")
            .route("", web::get().to(favorite_handlers::list_favorites_handler))
            .route("", web::post().to(favorite_handlers::add_favorite_handler))
            .route("/{product_id}", web::delete().to(favorite_handlers::remove_favorite_handler)),
        )
        .route("/reviews", web::post().to(review_handlers::create_review_handler))
        .route("/analytics/{podcast_id}", web::get().to(analytics_handlers::podcast_analytics_handler)),
    );
}
