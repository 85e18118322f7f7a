// castcart/core/src/settings.rs

use rust_decimal::Decimal;

/// Tunables shared by the services. The application builds this from its
/// environment configuration; tests usually take `Settings::default()`.
#[derive(Debug, Clone)]
pub struct Settings {
  /// Rate applied when an order's podcast is missing or inactive.
  pub default_commission_rate: Decimal,
  pub default_analytics_window_days: u32,
  pub max_analytics_window_days: u32,
  pub default_page_size: i64,
  pub max_page_size: i64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      default_commission_rate: Decimal::new(20, 2),
      default_analytics_window_days: 30,
      max_analytics_window_days: 365,
      default_page_size: 20,
      max_page_size: 100,
    }
  }
}
