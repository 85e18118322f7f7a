// castcart/core/src/model/click.rs

use super::actor::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_IP_LEN: usize = 64;
const MAX_USER_AGENT_LEN: usize = 1024;
const MAX_REFERRER_LEN: usize = 2048;

/// One outbound click on a product's affiliate link. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateClick {
  pub id: Uuid,
  pub user_id: Option<ActorId>,
  pub product_id: Uuid,
  pub podcast_id: Uuid,
  pub ip_address: Option<String>,
  pub user_agent: Option<String>,
  pub referrer: Option<String>,
  pub clicked_at: DateTime<Utc>,
}

/// Transport metadata of the request that produced a click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestProvenance {
  pub ip_address: Option<String>,
  pub user_agent: Option<String>,
  pub referrer: Option<String>,
}

impl RequestProvenance {
  /// Drops blank values and bounds the length of what gets stored.
  pub fn normalized(self) -> Self {
    Self {
      ip_address: clip(self.ip_address, MAX_IP_LEN),
      user_agent: clip(self.user_agent, MAX_USER_AGENT_LEN),
      referrer: clip(self.referrer, MAX_REFERRER_LEN),
    }
  }
}

fn clip(value: Option<String>, max_chars: usize) -> Option<String> {
  let value = value?;
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return None;
  }
  Some(trimmed.chars().take(max_chars).collect())
}
