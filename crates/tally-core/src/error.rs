//! Error types for `tally-core`.

use thiserror::Error;

use crate::identity::{ActorId, ItemId, SupplierId};

#[derive(Debug, Error)]
pub enum Error {
  /// Caller is neither the owner nor a registered supplier.
  #[error("unauthorized: {0} is not the owner or a registered supplier")]
  Unauthorized(ActorId),

  #[error("receipt for item {item} already recorded by supplier {supplier}")]
  AlreadyRecorded { item: ItemId, supplier: SupplierId },

  #[error("item {item} already witnessed by {witness}")]
  AlreadyWitnessed { item: ItemId, witness: ActorId },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
