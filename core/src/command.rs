// castcart/core/src/command.rs

//! Syntactic validation of write inputs.
//!
//! Every write path first turns loosely typed request fields into one of the
//! command types below. A command that exists is well formed; whether the
//! entities it references exist is checked later by the owning service,
//! against the catalog store, right before persisting.

use crate::error::{CastcartError, CastcartResult};
use crate::settings::Settings;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use uuid::Uuid;

const MAX_COMMENT_CHARS: usize = 4000;
const MAX_EXTERNAL_ID_CHARS: usize = 128;

/// Largest amount a `NUMERIC(10, 2)` column holds: 99,999,999.99.
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Parses a required identifier field. Empty and malformed values are both
/// validation failures naming the field.
pub fn parse_id(field: &str, raw: &str) -> CastcartResult<Uuid> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err(CastcartError::validation(format!("{} is required", field)));
  }
  Uuid::parse_str(raw).map_err(|_| CastcartError::validation(format!("{} is not a valid id", field)))
}

fn require_text(field: &str, raw: &str) -> CastcartResult<String> {
  let value = raw.trim();
  if value.is_empty() {
    return Err(CastcartError::validation(format!("{} is required", field)));
  }
  Ok(value.to_string())
}

fn optional_text(raw: Option<String>) -> Option<String> {
  raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Non-negative amount up to [`MAX_MONEY`] with at most two fractional digits.
pub fn validate_money(field: &str, amount: Decimal) -> CastcartResult<Decimal> {
  if amount.is_sign_negative() && !amount.is_zero() {
    return Err(CastcartError::validation(format!("{} must not be negative", field)));
  }
  if amount > MAX_MONEY {
    return Err(CastcartError::validation(format!("{} must not exceed {}", field, MAX_MONEY)));
  }
  if amount.normalize().scale() > 2 {
    return Err(CastcartError::validation(format!(
      "{} must have at most two decimal places",
      field
    )));
  }
  Ok(to_cents(amount))
}

/// Fixes the scale at two digits so amounts print as `12.50`, not `12.5`.
pub(crate) fn to_cents(amount: Decimal) -> Decimal {
  let mut fixed = amount;
  fixed.rescale(2);
  fixed
}

/// Commission rate in `[0, 1]` with at most two fractional digits.
pub fn validate_rate(rate: Decimal) -> CastcartResult<Decimal> {
  if rate < Decimal::ZERO || rate > Decimal::ONE {
    return Err(CastcartError::validation("commissionRate must be between 0 and 1"));
  }
  if rate.normalize().scale() > 2 {
    return Err(CastcartError::validation(
      "commissionRate must have at most two decimal places",
    ));
  }
  Ok(rate)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
  pub product_id: Uuid,
  pub podcast_id: Uuid,
}

impl NewClick {
  pub fn parse(product_id: &str, podcast_id: &str) -> CastcartResult<Self> {
    Ok(Self {
      product_id: parse_id("productId", product_id)?,
      podcast_id: parse_id("podcastId", podcast_id)?,
    })
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub product_id: Uuid,
  pub podcast_id: Uuid,
  pub quantity: i32,
  /// Line total (quantity times unit price).
  pub price: Decimal,
  pub external_order_id: Option<String>,
}

impl NewOrder {
  pub fn new(
    product_id: Uuid,
    podcast_id: Uuid,
    quantity: i32,
    price: Decimal,
    external_order_id: Option<String>,
  ) -> CastcartResult<Self> {
    if quantity < 1 {
      return Err(CastcartError::validation("quantity must be at least 1"));
    }
    let price = validate_money("price", price)?;
    let external_order_id = optional_text(external_order_id);
    if let Some(ext) = &external_order_id {
      if ext.chars().count() > MAX_EXTERNAL_ID_CHARS {
        return Err(CastcartError::validation("externalOrderId is too long"));
      }
    }
    Ok(Self {
      product_id,
      podcast_id,
      quantity,
      price,
      external_order_id,
    })
  }

  pub fn parse(
    product_id: &str,
    podcast_id: &str,
    quantity: i32,
    price: Decimal,
    external_order_id: Option<String>,
  ) -> CastcartResult<Self> {
    Self::new(
      parse_id("productId", product_id)?,
      parse_id("podcastId", podcast_id)?,
      quantity,
      price,
      external_order_id,
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
  pub product_id: Uuid,
  pub rating: i32,
  pub comment: Option<String>,
}

impl NewReview {
  pub fn parse(product_id: &str, rating: i32, comment: Option<String>) -> CastcartResult<Self> {
    let product_id = parse_id("productId", product_id)?;
    if !(1..=5).contains(&rating) {
      return Err(CastcartError::validation("rating must be between 1 and 5"));
    }
    let comment = optional_text(comment);
    if comment.as_ref().map_or(false, |c| c.chars().count() > MAX_COMMENT_CHARS) {
      return Err(CastcartError::validation(format!(
        "comment must be at most {} characters",
        MAX_COMMENT_CHARS
      )));
    }
    Ok(Self {
      product_id,
      rating,
      comment,
    })
  }
}

/// Raw operator input for a podcast; see [`NewPodcast::parse`].
#[derive(Debug, Clone, Default)]
pub struct PodcastFields {
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

#[derive(Debug, Clone, PartialEq)]
pub struct NewPodcast {
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub logo: Option<String>,
  pub category: String,
  pub host_name: String,
  pub listener_count: Option<i32>,
  pub commission_rate: Decimal,
  pub partner_email: String,
}

impl NewPodcast {
  pub fn parse(fields: PodcastFields, settings: &Settings) -> CastcartResult<Self> {
    let slug = fields.slug.trim().to_string();
    if slug.is_empty()
      || !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
      return Err(CastcartError::validation(
        "slug must be non-empty and contain only lowercase letters, digits and '-'",
      ));
    }
    let partner_email = require_text("partnerEmail", &fields.partner_email)?;
    if !partner_email.contains('@') {
      return Err(CastcartError::validation("partnerEmail must be an email address"));
    }
    if fields.listener_count.map_or(false, |n| n < 0) {
      return Err(CastcartError::validation("listenerCount must not be negative"));
    }
    let commission_rate = match fields.commission_rate {
      Some(rate) => validate_rate(rate)?,
      None => settings.default_commission_rate,
    };
    Ok(Self {
      name: require_text("name", &fields.name)?,
      slug,
      description: optional_text(fields.description),
      logo: optional_text(fields.logo),
      category: require_text("category", &fields.category)?,
      host_name: require_text("hostName", &fields.host_name)?,
      listener_count: fields.listener_count,
      commission_rate,
      partner_email,
    })
  }
}

/// Raw operator input for a product; see [`NewProduct::parse`].
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub images: Vec<String>,
  pub category: String,
  pub sizes: Vec<String>,
  pub colors: Vec<String>,
  pub inventory: Option<i32>,
  pub podcast_id: String,
  pub affiliate_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: Option<String>,
  pub price: Decimal,
  pub images: Vec<String>,
  pub category: String,
  pub sizes: BTreeSet<String>,
  pub colors: BTreeSet<String>,
  pub inventory: i32,
  pub podcast_id: Uuid,
  pub affiliate_url: String,
}

impl NewProduct {
  pub fn parse(fields: ProductFields) -> CastcartResult<Self> {
    let inventory = fields.inventory.unwrap_or(0);
    if inventory < 0 {
      return Err(CastcartError::validation("inventory must not be negative"));
    }
    let affiliate_url = require_text("affiliateUrl", &fields.affiliate_url)?;
    if !(affiliate_url.starts_with("https://") || affiliate_url.starts_with("http://")) {
      return Err(CastcartError::validation("affiliateUrl must be an absolute http(s) URL"));
    }
    let to_set = |values: Vec<String>| -> BTreeSet<String> {
      values.into_iter().filter_map(|v| optional_text(Some(v))).collect()
    };
    Ok(Self {
      name: require_text("name", &fields.name)?,
      description: optional_text(fields.description),
      price: validate_money("price", fields.price)?,
      images: fields.images.into_iter().filter_map(|i| optional_text(Some(i))).collect(),
      category: require_text("category", &fields.category)?,
      sizes: to_set(fields.sizes),
      colors: to_set(fields.colors),
      inventory,
      podcast_id: parse_id("podcastId", &fields.podcast_id)?,
      affiliate_url,
    })
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastPatch {
  pub commission_rate: Option<Decimal>,
  pub is_active: Option<bool>,
}

impl PodcastPatch {
  pub fn parse(commission_rate: Option<Decimal>, is_active: Option<bool>) -> CastcartResult<Self> {
    if commission_rate.is_none() && is_active.is_none() {
      return Err(CastcartError::validation(
        "at least one of commissionRate or isActive is required",
      ));
    }
    Ok(Self {
      commission_rate: commission_rate.map(validate_rate).transpose()?,
      is_active,
    })
  }
}

/// A podcast reference as it appears in query strings: an id or a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodcastRef {
  Id(Uuid),
  Slug(String),
}

impl PodcastRef {
  pub fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return None;
    }
    Some(match Uuid::parse_str(raw) {
      Ok(id) => PodcastRef::Id(id),
      Err(_) => PodcastRef::Slug(raw.to_string()),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
  pub podcast: Option<PodcastRef>,
  pub category: Option<String>,
  pub limit: i64,
  pub offset: i64,
}

impl ProductQuery {
  pub fn parse(
    podcast: Option<&str>,
    category: Option<&str>,
    limit: Option<i64>,
    offset: Option<i64>,
    settings: &Settings,
  ) -> CastcartResult<Self> {
    let limit = limit.unwrap_or(settings.default_page_size);
    if limit < 1 || limit > settings.max_page_size {
      return Err(CastcartError::validation(format!(
        "limit must be between 1 and {}",
        settings.max_page_size
      )));
    }
    let offset = offset.unwrap_or(0);
    if offset < 0 {
      return Err(CastcartError::validation("offset must not be negative"));
    }
    Ok(Self {
      podcast: podcast.and_then(PodcastRef::parse),
      category: category.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
      limit,
      offset,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
  }

  #[test]
  fn parse_id_rejects_empty_and_garbage() {
    assert!(matches!(parse_id("productId", "  "), Err(CastcartError::Validation(m)) if m.contains("required")));
    assert!(matches!(parse_id("productId", "widget"), Err(CastcartError::Validation(m)) if m.contains("not a valid id")));
    let id = Uuid::new_v4();
    assert_eq!(parse_id("productId", &id.to_string()).unwrap(), id);
  }

  #[test]
  fn order_requires_positive_quantity_and_two_decimal_price() {
    let (p, c) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(NewOrder::new(p, c, 0, dec("10.00"), None).is_err());
    assert!(NewOrder::new(p, c, 1, dec("-0.01"), None).is_err());
    assert!(NewOrder::new(p, c, 1, dec("10.001"), None).is_err());

    let order = NewOrder::new(p, c, 2, dec("100.0"), Some("  ".into())).unwrap();
    assert_eq!(order.price, dec("100.00"));
    assert_eq!(order.external_order_id, None);
  }

  #[test]
  fn trailing_zeros_do_not_count_as_precision() {
    assert_eq!(validate_money("price", dec("12.5000")).unwrap(), dec("12.50"));
    assert_eq!(validate_money("price", Decimal::ZERO).unwrap(), Decimal::ZERO);
  }

  #[test]
  fn money_fits_the_column() {
    assert_eq!(MAX_MONEY, dec("99999999.99"));
    assert_eq!(validate_money("price", dec("99999999.99")).unwrap().to_string(), "99999999.99");
    assert!(validate_money("price", dec("100000000.00")).is_err());
    assert!(validate_money("price", Decimal::MAX).is_err());
  }

  #[test]
  fn rate_bounds() {
    assert!(validate_rate(dec("1.01")).is_err());
    assert!(validate_rate(dec("-0.1")).is_err());
    assert!(validate_rate(dec("0.125")).is_err());
    assert_eq!(validate_rate(dec("0.35")).unwrap(), dec("0.35"));
  }

  #[test]
  fn review_rating_range() {
    let id = Uuid::new_v4().to_string();
    assert!(NewReview::parse(&id, 0, None).is_err());
    assert!(NewReview::parse(&id, 6, None).is_err());
    let review = NewReview::parse(&id, 5, Some(" great ".into())).unwrap();
    assert_eq!(review.comment.as_deref(), Some("great"));
  }

  #[test]
  fn podcast_slug_and_default_rate() {
    let settings = Settings::default();
    let fields = PodcastFields {
      name: "Acme Show".into(),
      slug: "acme-show".into(),
      category: "tech".into(),
      host_name: "Ada".into(),
      partner_email: "partners@acme.fm".into(),
      ..Default::default()
    };
    let podcast = NewPodcast::parse(fields.clone(), &settings).unwrap();
    assert_eq!(podcast.commission_rate, dec("0.20"));

    let bad = PodcastFields {
      slug: "Acme Show".into(),
      ..fields
    };
    assert!(NewPodcast::parse(bad, &settings).is_err());
  }

  #[test]
  fn product_query_defaults_and_bounds() {
    let settings = Settings::default();
    let q = ProductQuery::parse(Some("acme-show"), Some(""), None, None, &settings).unwrap();
    assert_eq!(q.limit, 20);
    assert_eq!(q.offset, 0);
    assert_eq!(q.podcast, Some(PodcastRef::Slug("acme-show".into())));
    assert_eq!(q.category, None);

    assert!(ProductQuery::parse(None, None, Some(0), None, &settings).is_err());
    assert!(ProductQuery::parse(None, None, Some(101), None, &settings).is_err());
    assert!(ProductQuery::parse(None, None, None, Some(-1), &settings).is_err());
  }
}
