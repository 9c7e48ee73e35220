//! Actor, supplier, and item identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── ActorId ─────────────────────────────────────────────────────────────────

/// Opaque address of an external actor.
///
/// The ledger never interprets the contents; equality is the only operation
/// performed on it. Authenticating that a request really comes from this
/// address is a transport concern and out of scope here.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub String);

impl ActorId {
  pub fn new(s: impl Into<String>) -> Self {
    Self(s.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── SupplierId ──────────────────────────────────────────────────────────────

/// Sequential supplier identifier, assigned from 1 at registration.
///
/// Zero never denotes a real supplier. Internal APIs use
/// `Option<SupplierId>` for "unregistered"; only the wire surface renders
/// absence as `0`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct SupplierId(pub u64);

impl fmt::Display for SupplierId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── ItemId ──────────────────────────────────────────────────────────────────

/// Identifier of a tracked shipment unit.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
