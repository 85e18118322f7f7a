// castcart/core/src/lib.rs

//! castcart: the attribution and ledger core of a podcast affiliate catalog.
//!
//! Podcasts recommend products; users click through to retailer links; clicks
//! and the orders that may follow are recorded; each order carries the
//! commission owed to the podcast partner, fixed at the moment it was written.
//!
//!  - [`Recorder`] appends immutable affiliate click events.
//!  - [`Ledger`] appends orders, computes commission and moves status forward.
//!  - [`FavoritesIndex`] keeps the idempotent user/product favorites set.
//!  - [`Reviews`] is the per-product rating log.
//!  - [`Aggregator`] rolls clicks and orders into per-day, per-podcast analytics.
//!  - [`Catalog`] serves podcasts and products and takes operator writes.
//!
//! Write inputs are first turned into typed commands ([`command`]); services
//! then check referential integrity against the catalog before persisting
//! through the traits in [`store`].

pub mod command;
pub mod error;
pub mod model;
pub mod service;
pub mod settings;
pub mod store;

pub use crate::command::{NewClick, NewOrder, NewPodcast, NewProduct, NewReview, PodcastPatch, ProductQuery};
pub use crate::error::{CastcartError, CastcartResult};
pub use crate::model::{ActorId, OrderStatus, RequestProvenance};
pub use crate::service::{Aggregator, Catalog, FavoritesIndex, Ledger, Recorder, Reviews, Services};
pub use crate::settings::Settings;
pub use crate::store::{MemoryStore, Store};
