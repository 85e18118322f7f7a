// castcart/app/src/db/seed.rs

use crate::errors::Result;
use castcart::command::{PodcastFields, ProductFields};
use castcart::{CastcartError, NewPodcast, NewProduct, Services};
use rust_decimal::Decimal;
use tracing::{info, instrument};

const DEMO_SLUG: &str = "tech-talk-daily";

/// Inserts a demo podcast with a few products unless it is already there.
#[instrument(name = "db::seed_demo_catalog", skip(services))]
pub async fn seed_demo_catalog(services: &Services) -> Result<()> {
  match services.catalog.podcast_by_slug(DEMO_SLUG).await {
    Ok(_) => {
      info!("Demo catalog already present, skipping seed.");
      return Ok(());
    }
    Err(CastcartError::NotFound(_)) => {}
    Err(e) => return Err(e.into()),
  }

  let podcast = services
    .catalog
    .create_podcast(NewPodcast::parse(
      PodcastFields {
        name: "Tech Talk Daily".to_string(),
        slug: DEMO_SLUG.to_string(),
        description: Some("Daily conversations about the gadgets and software shaping work.".to_string()),
        logo: Some("https://cdn.castcart.dev/logos/tech-talk-daily.png".to_string()),
        category: "technology".to_string(),
        host_name: "Sam Rivera".to_string(),
        listener_count: Some(48_000),
        commission_rate: Some(Decimal::new(15, 2)),
        partner_email: "partners@techtalkdaily.fm".to_string(),
      },
      &services.settings,
    )?)
    .await?;

  let products = [
    ("Studio Headphones", Decimal::new(12_900, 2), "audio", vec!["black", "silver"], vec![]),
    ("Logo Hoodie", Decimal::new(5_500, 2), "apparel", vec!["navy"], vec!["S", "M", "L", "XL"]),
    ("Mechanical Keyboard", Decimal::new(8_999, 2), "accessories", vec!["white"], vec![]),
  ];
  for (name, price, category, colors, sizes) in products {
    let slug = name.to_lowercase().replace(' ', "-");
    let cmd = NewProduct::parse(ProductFields {
      name: name.to_string(),
      description: None,
      price,
      images: vec![format!("https://cdn.castcart.dev/products/{}.jpg", slug)],
      category: category.to_string(),
      sizes: sizes.into_iter().map(str::to_string).collect(),
      colors: colors.into_iter().map(str::to_string).collect(),
      inventory: Some(100),
      podcast_id: podcast.id.to_string(),
      affiliate_url: format!("https://shop.example.com/{}?ref={}", slug, DEMO_SLUG),
    })?;
    services.catalog.create_product(cmd).await?;
  }

  info!(podcast_id = %podcast.id, "Demo catalog seeded.");
  Ok(())
}
