//! Ledger notifications.
//!
//! One event is emitted per successful mutation, after all state for the
//! call is written. Downstream indexers depend on these payloads verbatim;
//! the field sets must not change without versioning the feed.

use serde::{Deserialize, Serialize};

use crate::{
  identity::{ActorId, ItemId, SupplierId},
  record::Digest,
};

/// Fire-and-observe notification. Delivery is at-least-once to subscribers
/// that keep up with the broadcast channel, ordered per emitting call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
  SupplierRegistered {
    id:       SupplierId,
    identity: ActorId,
    details:  String,
  },
  ShipmentReceived {
    item:         ItemId,
    caller:       ActorId,
    content_hash: Digest,
    metadata:     String,
  },
  ShipmentWitnessed {
    item:      ItemId,
    supplier:  SupplierId,
    name_hash: Digest,
  },
}
