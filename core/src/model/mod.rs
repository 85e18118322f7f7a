// castcart/core/src/model/mod.rs

//! Entities persisted by the stores and returned by the services.
//! All of them serialize as camelCase JSON; decimals serialize as strings.

pub mod actor;
pub mod analytics;
pub mod click;
pub mod favorite;
pub mod order;
pub mod podcast;
pub mod product;
pub mod review;

pub use actor::ActorId;
pub use analytics::{DailyClicks, OrderTotals, PodcastAnalytics};
pub use click::{AffiliateClick, RequestProvenance};
pub use favorite::{Favorite, FavoriteEntry};
pub use order::{Order, OrderStatus, OrderSummary, PodcastBrief, ProductBrief};
pub use podcast::{Podcast, PodcastSummary};
pub use product::{Product, ProductListing, ProductSnapshot};
pub use review::Review;
