//! Core types and ledger logic for the Tally shipment checkpoint store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The [`ledger::Ledger`] service owns the business rules — owner-only
//! supplier registration, write-once receipt recording, and
//! one-attestation-per-witness bookkeeping — over any backend implementing
//! [`store::ShipmentStore`]. The in-memory backend lives in [`memory`]; the
//! durable one in the `tally-store-sqlite` crate.

pub mod error;
pub mod event;
pub mod identity;
pub mod ledger;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{Error, Result};
