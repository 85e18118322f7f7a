// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use castcart::command::{PodcastFields, ProductFields};
use castcart::model::{AffiliateClick, Podcast, Product};
use castcart::{ActorId, MemoryStore, NewPodcast, NewProduct, Services, Settings};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn dec(s: &str) -> Decimal {
  s.parse().expect("valid decimal literal")
}

pub fn actor(id: &str) -> ActorId {
  ActorId::new(id)
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// A catalog with podcast `acme-show` (rate 0.20) owning product `widget` (50.00).
pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub services: Arc<Services>,
  pub acme: Podcast,
  pub widget: Product,
}

pub fn podcast_fields(slug: &str, rate: Option<&str>) -> PodcastFields {
  PodcastFields {
    name: format!("The {} podcast", slug),
    slug: slug.to_string(),
    logo: Some(format!("https://cdn.example.com/{}.png", slug)),
    category: "technology".to_string(),
    host_name: "Ada Host".to_string(),
    commission_rate: rate.map(dec),
    partner_email: format!("partners@{}.fm", slug),
    ..Default::default()
  }
}

pub fn product_fields(name: &str, price: &str, podcast_id: Uuid, category: &str) -> ProductFields {
  ProductFields {
    name: name.to_string(),
    price: dec(price),
    images: vec![format!("https://cdn.example.com/{}.jpg", name)],
    category: category.to_string(),
    sizes: vec!["M".to_string(), "L".to_string()],
    colors: vec!["black".to_string()],
    inventory: Some(10),
    podcast_id: podcast_id.to_string(),
    affiliate_url: format!("https://shop.example.com/{}", name),
    ..Default::default()
  }
}

pub async fn add_podcast(services: &Services, slug: &str, rate: Option<&str>) -> Podcast {
  let cmd = NewPodcast::parse(podcast_fields(slug, rate), &services.settings).unwrap();
  services.catalog.create_podcast(cmd).await.unwrap()
}

pub async fn add_product(services: &Services, name: &str, price: &str, podcast_id: Uuid) -> Product {
  let cmd = NewProduct::parse(product_fields(name, price, podcast_id, "gadgets")).unwrap();
  services.catalog.create_product(cmd).await.unwrap()
}

pub async fn acme_fixture() -> Fixture {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let services = Arc::new(Services::new(store.clone(), Settings::default()));
  let acme = add_podcast(&services, "acme-show", Some("0.20")).await;
  let widget = add_product(&services, "widget", "50.00", acme.id).await;
  Fixture {
    store,
    services,
    acme,
    widget,
  }
}

/// A click row with an explicit timestamp, for appending straight to the log.
pub fn click_at(product_id: Uuid, podcast_id: Uuid, clicked_at: DateTime<Utc>) -> AffiliateClick {
  AffiliateClick {
    id: Uuid::new_v4(),
    user_id: None,
    product_id,
    podcast_id,
    ip_address: Some("203.0.113.7".to_string()),
    user_agent: Some("test-agent".to_string()),
    referrer: None,
    clicked_at,
  }
}
