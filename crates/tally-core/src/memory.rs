//! In-memory [`ShipmentStore`] backend.
//!
//! The whole ledger state is one struct owning three maps plus the supplier
//! id counter, behind a single mutex. Every [`MemoryStore`] is an
//! independent instance, so tests can run many ledgers in parallel.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};

use crate::{
  identity::{ActorId, ItemId, SupplierId},
  record::{Digest, ShipmentRecord, Supplier, WitnessRecord},
  store::ShipmentStore,
};

#[derive(Debug, Default)]
struct State {
  /// identity → current supplier row. Re-registration replaces the entry;
  /// the old id lives on only as a number inside already-written records.
  suppliers:        HashMap<ActorId, Supplier>,
  shipments:        HashMap<(ItemId, SupplierId), ShipmentRecord>,
  witnesses:        HashMap<(ItemId, ActorId), WitnessRecord>,
  /// Last id handed out; the first registration gets 1.
  last_supplier_id: u64,
}

/// A Tally store held entirely in process memory.
///
/// Cloning is cheap — clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<State>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    // Nothing in here panics while holding the lock; recover anyway.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl ShipmentStore for MemoryStore {
  type Error = Infallible;

  async fn insert_supplier(
    &self,
    identity: ActorId,
    details: String,
    registered_at: DateTime<Utc>,
  ) -> Result<Supplier, Infallible> {
    let mut state = self.lock();
    state.last_supplier_id += 1;
    let supplier = Supplier {
      id: SupplierId(state.last_supplier_id),
      identity: identity.clone(),
      details,
      registered_at,
    };
    state.suppliers.insert(identity, supplier.clone());
    Ok(supplier)
  }

  async fn supplier_id(
    &self,
    identity: &ActorId,
  ) -> Result<Option<SupplierId>, Infallible> {
    Ok(self.lock().suppliers.get(identity).map(|s| s.id))
  }

  async fn shipment(
    &self,
    item: ItemId,
    supplier: SupplierId,
  ) -> Result<Option<ShipmentRecord>, Infallible> {
    Ok(self.lock().shipments.get(&(item, supplier)).cloned())
  }

  async fn set_receipt(
    &self,
    item: ItemId,
    supplier: SupplierId,
    content_hash: Digest,
    recorded_at: DateTime<Utc>,
  ) -> Result<(), Infallible> {
    let mut state = self.lock();
    let record = state
      .shipments
      .entry((item, supplier))
      .or_insert_with(|| ShipmentRecord::witnessed_only(item, supplier));
    record.content_hash = Some(content_hash);
    record.recorded_at = Some(recorded_at);
    Ok(())
  }

  async fn witness(
    &self,
    item: ItemId,
    witness: &ActorId,
  ) -> Result<Option<WitnessRecord>, Infallible> {
    Ok(self.lock().witnesses.get(&(item, witness.clone())).cloned())
  }

  async fn record_witness(
    &self,
    record: WitnessRecord,
  ) -> Result<u64, Infallible> {
    let mut state = self.lock();
    let shipment = state
      .shipments
      .entry((record.item, record.supplier))
      .or_insert_with(|| {
        ShipmentRecord::witnessed_only(record.item, record.supplier)
      });
    shipment.witness_count += 1;
    let count = shipment.witness_count;
    state
      .witnesses
      .insert((record.item, record.witness.clone()), record);
    Ok(count)
  }
}
