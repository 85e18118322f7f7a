// castcart/core/src/service/analytics.rs

//! Partner-facing aggregation over the click log and the order ledger.
//! Nothing is cached: every call re-reads both stores.

use crate::error::{CastcartError, CastcartResult};
use crate::model::{DailyClicks, PodcastAnalytics};
use crate::settings::Settings;
use crate::store::{ClickLog, OrderStore};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Groups click timestamps by UTC calendar day, most recent day first, and
/// keeps only the `window_days` most recent days that have at least one click.
pub fn bucket_clicks_by_day<I>(clicked_at: I, window_days: u32) -> Vec<DailyClicks>
where
  I: IntoIterator<Item = DateTime<Utc>>,
{
  let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
  for ts in clicked_at {
    *per_day.entry(ts.date_naive()).or_insert(0) += 1;
  }
  per_day
    .into_iter()
    .rev()
    .take(window_days as usize)
    .map(|(date, total)| DailyClicks { date, total })
    .collect()
}

pub struct Aggregator {
  clicks: Arc<dyn ClickLog>,
  orders: Arc<dyn OrderStore>,
  settings: Settings,
}

impl Aggregator {
  pub fn new(clicks: Arc<dyn ClickLog>, orders: Arc<dyn OrderStore>, settings: Settings) -> Self {
    Self {
      clicks,
      orders,
      settings,
    }
  }

  /// Clicks per day and order totals for one podcast.
  ///
  /// An unknown podcast yields empty analytics rather than `NotFound`: the
  /// ledger accepts orders whose podcast is missing from the catalog, and
  /// those must stay reportable.
  #[instrument(name = "analytics::podcast_analytics", skip(self), err)]
  pub async fn podcast_analytics(&self, podcast_id: Uuid, window_days: Option<u32>) -> CastcartResult<PodcastAnalytics> {
    let window = window_days.unwrap_or(self.settings.default_analytics_window_days);
    if window == 0 || window > self.settings.max_analytics_window_days {
      return Err(CastcartError::validation(format!(
        "days must be between 1 and {}",
        self.settings.max_analytics_window_days
      )));
    }

    let clicks_by_day = self.clicks.daily_clicks(podcast_id, window).await?;
    let order_totals = self.orders.order_totals(podcast_id).await?;

    debug!(
      days_with_clicks = clicks_by_day.len(),
      orders = order_totals.count,
      "Analytics computed for podcast {}.",
      podcast_id
    );
    Ok(PodcastAnalytics {
      clicks_by_day,
      order_totals,
    })
  }
}
