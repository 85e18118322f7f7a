// tests/api_tests.rs
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use castcart::command::{PodcastFields, ProductFields};
use castcart::model::{Podcast, Product};
use castcart::{MemoryStore, NewPodcast, NewProduct, Settings};
use castcart_app::state::AppState;
use castcart_app::web::configure_app_routes;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt().with_test_writer().try_init().ok();
});

struct Fixture {
  store: Arc<MemoryStore>,
  state: AppState,
  acme: Podcast,
  widget: Product,
}

async fn fixture() -> Fixture {
  Lazy::force(&TRACING_INIT);
  let store = Arc::new(MemoryStore::new());
  let state = AppState::new(store.clone(), Settings::default());
  let services = &state.services;

  let acme = services
    .catalog
    .create_podcast(
      NewPodcast::parse(
        PodcastFields {
          name: "Acme Show".into(),
          slug: "acme-show".into(),
          logo: Some("https://cdn.example.com/acme.png".into()),
          category: "technology".into(),
          host_name: "Ada Host".into(),
          commission_rate: Some(Decimal::new(20, 2)),
          partner_email: "partners@acme.fm".into(),
          ..Default::default()
        },
        &services.settings,
      )
      .unwrap(),
    )
    .await
    .unwrap();
  let widget = services
    .catalog
    .create_product(
      NewProduct::parse(ProductFields {
        name: "widget".into(),
        price: Decimal::new(5000, 2),
        category: "gadgets".into(),
        podcast_id: acme.id.to_string(),
        affiliate_url: "https://shop.example.com/widget?ref=acme".into(),
        ..Default::default()
      })
      .unwrap(),
    )
    .await
    .unwrap();

  Fixture {
    store,
    state,
    acme,
    widget,
  }
}

macro_rules! test_app {
  ($fx:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($fx.state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn test_health_reports_store_state() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "healthy");

  fx.store.set_offline(true);
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_products_filtered_by_podcast_slug() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let req = test::TestRequest::get()
    .uri("/api/products?podcast=acme-show&limit=1")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  let items = body.as_array().unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["name"], "widget");
  assert_eq!(items[0]["price"], "50.00");
  assert_eq!(items[0]["podcast"]["slug"], "acme-show");
  assert_eq!(items[0]["podcast"]["id"], fx.acme.id.to_string());

  let req = test::TestRequest::get().uri("/api/products?limit=0").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[actix_web::test]
async fn test_catalog_reads() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/podcasts/acme-show").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["commissionRate"], "0.20");
  assert_eq!(body["hostName"], "Ada Host");

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/podcasts/nobody").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let uri = format!("/api/products/{}", fx.widget.id);
  let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/categories").to_request()).await;
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!(["gadgets"]));
}

#[actix_web::test]
async fn test_click_recording_and_degradation() {
  let fx = fixture().await;
  let app = test_app!(fx);
  let payload = json!({"productId": fx.widget.id, "podcastId": fx.acme.id});

  let req = test::TestRequest::post()
    .uri("/api/clicks")
    .insert_header((header::USER_AGENT, "Podcatcher/2.1"))
    .insert_header((header::REFERER, "https://acme.fm/ep/7"))
    .set_json(&payload)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["userAgent"], "Podcatcher/2.1");
  assert_eq!(body["referrer"], "https://acme.fm/ep/7");
  assert_eq!(fx.store.click_count(), 1);

  let req = test::TestRequest::post()
    .uri("/api/clicks")
    .set_json(json!({"productId": "", "podcastId": fx.acme.id}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  fx.store.set_offline(true);
  let req = test::TestRequest::post().uri("/api/clicks").set_json(&payload).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::ACCEPTED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"tracked": false}));
}

#[actix_web::test]
async fn test_outbound_redirect_records_click() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let uri = format!("/api/go/{}", fx.widget.id);
  let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(
    resp.headers().get(header::LOCATION).unwrap(),
    "https://shop.example.com/widget?ref=acme"
  );
  assert_eq!(fx.store.click_count(), 1);

  let analytics = fx.state.services.analytics.podcast_analytics(fx.acme.id, None).await.unwrap();
  assert_eq!(analytics.clicks_by_day[0].total, 1);
}

#[actix_web::test]
async fn test_order_lifecycle_over_http() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(("X-User-Id", "user-1"))
    .set_json(json!({
      "productId": fx.widget.id,
      "podcastId": fx.acme.id,
      "quantity": 2,
      "price": "100.00",
      "commission": "99.00"
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let order: Value = test::read_body_json(resp).await;
  assert_eq!(order["commission"], "20.00");
  assert_eq!(order["status"], "pending");
  let status_uri = format!("/api/orders/{}/status", order["id"].as_str().unwrap());

  // Operator role required.
  let req = test::TestRequest::patch()
    .uri(&status_uri)
    .set_json(json!({"status": "fulfilled"}))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let patch = |status: &str| {
    test::TestRequest::patch()
      .uri(&status_uri)
      .insert_header(("X-User-Role", "admin"))
      .set_json(json!({ "status": status }))
      .to_request()
  };
  assert_eq!(test::call_service(&app, patch("refunded")).await.status(), StatusCode::BAD_REQUEST);
  assert_eq!(test::call_service(&app, patch("shipped")).await.status(), StatusCode::BAD_REQUEST);
  assert_eq!(test::call_service(&app, patch("fulfilled")).await.status(), StatusCode::OK);
  let resp = test::call_service(&app, patch("refunded")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["status"], "refunded");
  assert_eq!(body["commission"], "20.00");

  // History is identity-scoped.
  let resp = test::call_service(&app, test::TestRequest::get().uri("/api/orders").to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let req = test::TestRequest::get()
    .uri("/api/orders")
    .insert_header(("X-User-Id", "user-1"))
    .to_request();
  let history: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(history.as_array().unwrap().len(), 1);
  assert_eq!(history[0]["product"]["name"], "widget");
  assert_eq!(history[0]["podcast"]["name"], "Acme Show");
}

#[actix_web::test]
async fn test_order_validation() {
  let fx = fixture().await;
  let app = test_app!(fx);

  for body in [
    json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 0, "price": "10.00"}),
    json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 1, "price": "10.001"}),
    json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 1, "price": "-1"}),
    json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 1, "price": "1000000000.00"}),
    json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 1}),
  ] {
    let req = test::TestRequest::post().uri("/api/orders").set_json(&body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "accepted {}", body);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].is_string());
  }
}

#[actix_web::test]
async fn test_favorites_are_idempotent() {
  let fx = fixture().await;
  let app = test_app!(fx);
  let user = ("X-User-Id", "fan-1");

  for _ in 0..2 {
    let req = test::TestRequest::post()
      .uri("/api/favorites")
      .insert_header(user)
      .set_json(json!({"productId": fx.widget.id}))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
  }
  assert_eq!(fx.store.favorite_rows(&"fan-1".into(), fx.widget.id), 1);

  let req = test::TestRequest::get().uri("/api/favorites").insert_header(user).to_request();
  let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(listed[0]["product"]["name"], "widget");

  let uri = format!("/api/favorites/{}", fx.widget.id);
  for _ in 0..2 {
    let req = test::TestRequest::delete().uri(&uri).insert_header(user).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }
  assert_eq!(fx.store.favorite_rows(&"fan-1".into(), fx.widget.id), 0);

  let req = test::TestRequest::get().uri("/api/favorites").to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_reviews_over_http() {
  let fx = fixture().await;
  let app = test_app!(fx);
  let review = json!({"productId": fx.widget.id, "rating": 4, "comment": "Sturdy."});

  let req = test::TestRequest::post().uri("/api/reviews").set_json(&review).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  let req = test::TestRequest::post()
    .uri("/api/reviews")
    .insert_header(("X-User-Id", "critic"))
    .set_json(&review)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

  let req = test::TestRequest::post()
    .uri("/api/reviews")
    .insert_header(("X-User-Id", "critic"))
    .set_json(json!({"productId": fx.widget.id, "rating": 6}))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let uri = format!("/api/products/{}/reviews", fx.widget.id);
  let listed: Value = test::read_body_json(test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
  assert_eq!(listed[0]["userId"], "critic");

  let uri = format!("/api/products/{}/reviews", uuid::Uuid::new_v4());
  let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_analytics_endpoint() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let req = test::TestRequest::post()
    .uri("/api/clicks")
    .set_json(json!({"productId": fx.widget.id, "podcastId": fx.acme.id}))
    .to_request();
  test::call_service(&app, req).await;
  let req = test::TestRequest::post()
    .uri("/api/orders")
    .set_json(json!({"productId": fx.widget.id, "podcastId": fx.acme.id, "quantity": 1, "price": 50}))
    .to_request();
  test::call_service(&app, req).await;

  let uri = format!("/api/analytics/{}?days=7", fx.acme.id);
  let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["clicks"][0]["total"], 1);
  assert_eq!(body["orders"]["total"], 1);
  assert_eq!(body["orders"]["commission"], "10.00");

  for bad in ["?days=0", "?days=366", "?days=soon"] {
    let uri = format!("/api/analytics/{}{}", fx.acme.id, bad);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{} accepted", bad);
  }
}

#[actix_web::test]
async fn test_operator_catalog_writes() {
  let fx = fixture().await;
  let app = test_app!(fx);
  let podcast = json!({
    "name": "Night Shift",
    "slug": "night-shift",
    "category": "culture",
    "hostName": "Lee",
    "partnerEmail": "hello@nightshift.fm",
    "commissionRate": "0.30"
  });

  let req = test::TestRequest::post().uri("/api/podcasts").set_json(&podcast).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

  let admin = ("X-User-Role", "admin");
  let req = test::TestRequest::post()
    .uri("/api/podcasts")
    .insert_header(admin)
    .set_json(&podcast)
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;

  let req = test::TestRequest::post()
    .uri("/api/podcasts")
    .insert_header(admin)
    .set_json(&podcast)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

  let req = test::TestRequest::post()
    .uri("/api/products")
    .insert_header(admin)
    .set_json(json!({
      "name": "Tote",
      "price": "18.50",
      "category": "bags",
      "podcastId": created["id"],
      "affiliateUrl": "https://shop.example.com/tote",
      "sizes": ["one-size"]
    }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let tote: Value = test::read_body_json(resp).await;

  let uri = format!("/api/products/{}", tote["id"].as_str().unwrap());
  let req = test::TestRequest::patch()
    .uri(&uri)
    .insert_header(admin)
    .set_json(json!({"isActive": false}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = test::TestRequest::get().uri("/api/products?podcast=night-shift").to_request();
  let listed: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(listed, json!([]));

  let uri = format!("/api/podcasts/{}", created["id"].as_str().unwrap());
  let req = test::TestRequest::patch()
    .uri(&uri)
    .insert_header(admin)
    .set_json(json!({}))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_malformed_json_is_a_validation_error() {
  let fx = fixture().await;
  let app = test_app!(fx);

  let req = test::TestRequest::post()
    .uri("/api/clicks")
    .insert_header((header::CONTENT_TYPE, "application/json"))
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}
