// castcart/app/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use castcart::command::{parse_id, PodcastFields, ProductFields};
use castcart::{NewPodcast, NewProduct, PodcastPatch, ProductQuery};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::OperatorUser;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub podcast: Option<String>,
  pub category: Option<String>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePodcastPayload {
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub logo: Option<String>,
  pub category: String,
  pub host_name: String,
  pub listener_count: Option<i32>,
  pub commission_rate: Option<Decimal>,
  pub partner_email: String,
}

impl From<CreatePodcastPayload> for PodcastFields {
  fn from(p: CreatePodcastPayload) -> Self {
    PodcastFields {
      name: p.name,
      slug: p.slug,
      description: p.description,
      logo: p.logo,
      category: p.category,
      host_name: p.host_name,
      listener_count: p.listener_count,
      commission_rate: p.commission_rate,
      partner_email: p.partner_email,
    }
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
  #[serde(default)]
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  #[serde(default)]
  pub images: Vec<String>,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub sizes: Vec<String>,
  #[serde(default)]
  pub colors: Vec<String>,
  pub inventory: Option<i32>,
  #[serde(default)]
  pub podcast_id: String,
  #[serde(default)]
  pub affiliate_url: String,
}

impl From<CreateProductPayload> for ProductFields {
  fn from(p: CreateProductPayload) -> Self {
    ProductFields {
      name: p.name,
      description: p.description,
      price: p.price,
      images: p.images,
      category: p.category,
      sizes: p.sizes,
      colors: p.colors,
      inventory: p.inventory,
      podcast_id: p.podcast_id,
      affiliate_url: p.affiliate_url,
    }
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePodcastPayload {
  pub commission_rate: Option<Decimal>,
  pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
  pub is_active: bool,
}

#[instrument(name = "handler::list_podcasts", skip(app_state))]
pub async fn list_podcasts_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let podcasts = app_state.services.catalog.list_podcasts().await?;
  Ok(HttpResponse::Ok().json(podcasts))
}

#[instrument(name = "handler::get_podcast", skip(app_state, path), fields(slug = %path.as_str()))]
pub async fn get_podcast_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let podcast = app_state.services.catalog.podcast_by_slug(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(podcast))
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let services = &app_state.services;
  let query = ProductQuery::parse(
    query_params.podcast.as_deref(),
    query_params.category.as_deref(),
    query_params.limit,
    query_params.offset,
    &services.settings,
  )?;
  let products = services.catalog.list_products(&query).await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id("productId", &path)?;
  let product = app_state.services.catalog.product(product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.services.catalog.categories().await?;
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::create_podcast", skip(app_state, payload, operator), fields(operator = ?operator.user_id))]
pub async fn create_podcast_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreatePodcastPayload>,
  operator: OperatorUser,
) -> Result<HttpResponse, AppError> {
  let services = &app_state.services;
  let cmd = NewPodcast::parse(payload.into_inner().into(), &services.settings)?;
  let podcast = services.catalog.create_podcast(cmd).await?;
  Ok(HttpResponse::Created().json(podcast))
}

#[instrument(name = "handler::update_podcast", skip(app_state, path, payload, operator), fields(operator = ?operator.user_id))]
pub async fn update_podcast_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<UpdatePodcastPayload>,
  operator: OperatorUser,
) -> Result<HttpResponse, AppError> {
  let podcast_id = parse_id("podcastId", &path)?;
  let patch = PodcastPatch::parse(payload.commission_rate, payload.is_active)?;
  let podcast = app_state.services.catalog.update_podcast(podcast_id, patch).await?;
  Ok(HttpResponse::Ok().json(podcast))
}

#[instrument(name = "handler::create_product", skip(app_state, payload, operator), fields(operator = ?operator.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateProductPayload>,
  operator: OperatorUser,
) -> Result<HttpResponse, AppError> {
  let cmd = NewProduct::parse(payload.into_inner().into())?;
  let product = app_state.services.catalog.create_product(cmd).await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload, operator), fields(operator = ?operator.user_id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<UpdateProductPayload>,
  operator: OperatorUser,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_id("productId", &path)?;
  let product = app_state
    .services
    .catalog
    .set_product_active(product_id, payload.is_active)
    .await?;
  Ok(HttpResponse::Ok().json(product))
}
