// castcart/app/src/lib.rs

//! HTTP surface and PostgreSQL backend for castcart. `main.rs` wires these
//! together; the integration tests mount the same routes over `MemoryStore`.

pub mod config;
pub mod db;
pub mod errors;
pub mod state;
pub mod telemetry;
pub mod web;
