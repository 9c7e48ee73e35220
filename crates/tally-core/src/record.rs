//! Record types — the persisted entities of the shipment ledger.
//!
//! All three record types are write-once: a supplier row, a receipt hash,
//! and a witness attestation are each set exactly once and never updated.
//! The only mutable field anywhere is `ShipmentRecord::witness_count`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::identity::{ActorId, ItemId, SupplierId};

// ─── Digest ──────────────────────────────────────────────────────────────────

/// A 32-byte hash value, hex-encoded on the wire.
///
/// Used both for content hashes (computed by the ledger over receipt
/// metadata) and for name hashes (supplied by witnesses as-is).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Digest {
  /// SHA-256 of `bytes`.
  ///
  /// The hash function is fixed for the lifetime of a ledger; changing it
  /// would break the already-recorded check for existing records.
  pub fn of(bytes: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Self(hasher.finalize().into())
  }

  pub fn to_hex(&self) -> String {
    hex::encode(self.0)
  }

  pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
    let raw = hex::decode(s)?;
    let bytes: [u8; 32] = raw
      .try_into()
      .map_err(|_| hex::FromHexError::InvalidStringLength)?;
    Ok(Self(bytes))
  }
}

impl fmt::Debug for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Digest({})", self.to_hex())
  }
}

impl fmt::Display for Digest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl Serialize for Digest {
  fn serialize<S: serde::Serializer>(
    &self,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_hex())
  }
}

impl<'de> Deserialize<'de> for Digest {
  fn deserialize<D: serde::Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Self::from_hex(&s).map_err(serde::de::Error::custom)
  }
}

// ─── Supplier ────────────────────────────────────────────────────────────────

/// An identity authorized to record shipment receipts.
///
/// Immutable once created; there is no removal or update operation.
/// Re-registering the same identity creates a *new* supplier row under a
/// fresh id rather than touching this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
  pub id:            SupplierId,
  pub identity:      ActorId,
  /// Opaque descriptive string supplied at registration.
  pub details:       String,
  /// Server-assigned; never accepted from callers.
  pub registered_at: DateTime<Utc>,
}

// ─── ShipmentRecord ──────────────────────────────────────────────────────────

/// Per-(item, supplier) receipt record.
///
/// `content_hash: None` marks a record that exists only because witnesses
/// named the pair before (or without) any receipt. The hash is set exactly
/// once, by `record_receipt`; presence of the `Option` is the "is set"
/// check, so a metadata string that happens to hash to all zeroes is still
/// handled correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRecord {
  pub item:          ItemId,
  pub supplier:      SupplierId,
  pub content_hash:  Option<Digest>,
  pub witness_count: u64,
  /// When the content hash was set; `None` while the record is hash-less.
  pub recorded_at:   Option<DateTime<Utc>>,
}

impl ShipmentRecord {
  /// A hash-less record created implicitly by the first witness of a pair.
  pub fn witnessed_only(item: ItemId, supplier: SupplierId) -> Self {
    Self {
      item,
      supplier,
      content_hash: None,
      witness_count: 0,
      recorded_at: None,
    }
  }
}

// ─── WitnessRecord ───────────────────────────────────────────────────────────

/// One actor's attestation that a supplier received an item.
///
/// At most one exists per (item, witness identity); immutable thereafter —
/// a witness cannot re-attest, not even to name a different supplier.
/// The named supplier id is caller-supplied and never validated against the
/// registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitnessRecord {
  pub item:        ItemId,
  pub witness:     ActorId,
  pub name_hash:   Digest,
  pub supplier:    SupplierId,
  /// Server-assigned; never accepted from callers.
  pub recorded_at: DateTime<Utc>,
}
