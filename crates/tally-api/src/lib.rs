//! JSON REST API for Tally.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tally_core::store::ShipmentStore`] through a [`Ledger`]. Write
//! requests carry the caller identity in the body; authenticating that the
//! request really originates from that identity (signatures, mTLS) is the
//! deployment's responsibility, as are TLS and rate limiting.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(ledger.clone()))
//! ```

pub mod error;
pub mod events;
pub mod receipts;
pub mod suppliers;
pub mod witnesses;

use std::path::PathBuf;

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tally_core::{ledger::Ledger, store::ShipmentStore};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database path; `:memory:` gives a throwaway store.
  pub store_path: PathBuf,
  /// Owner identity; bootstrapped as supplier id 1 on first open.
  pub owner:      String,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `ledger`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(ledger: Ledger<S>) -> Router<()>
where
  S: ShipmentStore + 'static,
{
  Router::new()
    // Identity registry
    .route("/suppliers", post(suppliers::register::<S>))
    .route("/suppliers/{identity}", get(suppliers::lookup::<S>))
    // Shipment ledger
    .route("/receipts", post(receipts::record::<S>))
    .route(
      "/items/{item}/suppliers/{supplier}/receipt",
      get(receipts::receipt_hash::<S>),
    )
    // Witness ledger
    .route("/witnesses", post(witnesses::attest::<S>))
    .route(
      "/items/{item}/suppliers/{supplier}/witnesses",
      get(witnesses::count::<S>),
    )
    .route("/items/{item}/witnesses/{identity}", get(witnesses::info::<S>))
    // Notifications
    .route("/events", get(events::stream::<S>))
    .with_state(ledger)
}

// ─── Integration tests ────────────────────────────────────────────────────────
