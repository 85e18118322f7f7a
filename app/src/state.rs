// castcart/app/src/state.rs
use castcart::{Services, Settings, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub services: Arc<Services>,
}

impl AppState {
  /// Wires every service against one backend: `PgStore` in the server,
  /// `MemoryStore` in tests and local runs.
  pub fn new<S: Store>(store: Arc<S>, settings: Settings) -> Self {
    Self {
      services: Arc::new(Services::new(store, settings)),
    }
  }
}
