//! The `ShipmentStore` trait — persistence seam between the ledger and its
//! backends.
//!
//! Backends persist rows and enforce no business rules. Write-once and
//! duplicate-attestation checks live in [`crate::ledger::Ledger`], which
//! serializes all writes, so every trait method is a plain lookup or a
//! single atomic write.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  identity::{ActorId, ItemId, SupplierId},
  record::{Digest, ShipmentRecord, Supplier, WitnessRecord},
};

/// Abstraction over a Tally persistence backend.
pub trait ShipmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Suppliers ─────────────────────────────────────────────────────────

  /// Insert a supplier under the next sequential id (starting at 1) and
  /// point `identity` at it, replacing any previous mapping for the same
  /// identity. The displaced supplier row, if any, is kept.
  fn insert_supplier(
    &self,
    identity: ActorId,
    details: String,
    registered_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Supplier, Self::Error>> + Send + '_;

  /// Resolve an identity to the supplier id it currently maps to.
  fn supplier_id<'a>(
    &'a self,
    identity: &'a ActorId,
  ) -> impl Future<Output = Result<Option<SupplierId>, Self::Error>> + Send + 'a;

  // ── Shipments ─────────────────────────────────────────────────────────

  /// Fetch the (item, supplier) record, if any.
  fn shipment(
    &self,
    item: ItemId,
    supplier: SupplierId,
  ) -> impl Future<Output = Result<Option<ShipmentRecord>, Self::Error>> + Send + '_;

  /// Set the content hash on the (item, supplier) record, creating the
  /// record if absent and preserving its witness count. The ledger has
  /// already checked that no hash is set.
  fn set_receipt(
    &self,
    item: ItemId,
    supplier: SupplierId,
    content_hash: Digest,
    recorded_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Witnesses ─────────────────────────────────────────────────────────

  /// Fetch the attestation this identity made for `item`, if any.
  fn witness<'a>(
    &'a self,
    item: ItemId,
    witness: &'a ActorId,
  ) -> impl Future<Output = Result<Option<WitnessRecord>, Self::Error>> + Send + 'a;

  /// Store an attestation and bump the witness counter of the named
  /// (item, supplier) pair in one atomic step, creating a hash-less
  /// shipment record if none exists. Returns the new counter value.
  /// The ledger has already checked that this witness has no attestation
  /// for the item.
  fn record_witness(
    &self,
    record: WitnessRecord,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
