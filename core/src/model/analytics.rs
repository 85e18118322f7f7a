// castcart/core/src/model/analytics.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of clicks on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyClicks {
  pub date: NaiveDate,
  pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
  #[serde(rename = "total")]
  pub count: i64,
  #[serde(rename = "revenue")]
  pub revenue_sum: Decimal,
  #[serde(rename = "commission")]
  pub commission_sum: Decimal,
}

impl Default for OrderTotals {
  fn default() -> Self {
    Self {
      count: 0,
      revenue_sum: Decimal::ZERO,
      commission_sum: Decimal::ZERO,
    }
  }
}

/// Partner-facing report for one podcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastAnalytics {
  /// Most recent day first; days without clicks are absent.
  #[serde(rename = "clicks")]
  pub clicks_by_day: Vec<DailyClicks>,
  #[serde(rename = "orders")]
  pub order_totals: OrderTotals,
}
