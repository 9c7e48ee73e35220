//! [`Ledger`] — the service implementing the four checkpoint-store roles
//! over any [`ShipmentStore`] backend: identity registry, access
//! controller, shipment ledger, and witness ledger.
//!
//! # Concurrency
//!
//! All state-mutating calls serialize behind one async mutex, making each
//! call atomic against the shared state: every precondition is checked
//! before any write happens, so a rejected call mutates nothing. Reads
//! bypass the lock. Expected throughput is low; a per-key lock table is
//! not worth its complexity here.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, broadcast};

use crate::{
  Error, Result,
  event::LedgerEvent,
  identity::{ActorId, ItemId, SupplierId},
  record::{Digest, Supplier, WitnessRecord},
  store::ShipmentStore,
};

/// Subscribers lagging more than this many events behind observe a
/// `Lagged` gap on the channel, never missing ledger state itself.
const EVENT_CHANNEL_CAPACITY: usize = 256;

struct Inner<S> {
  store:      S,
  owner:      ActorId,
  events:     broadcast::Sender<LedgerEvent>,
  /// Serializes `register_supplier`, `record_receipt`, and `witness`.
  write_lock: Mutex<()>,
}

/// Handle to one ledger instance.
///
/// Cloning is cheap — clones share the same backend, owner, and
/// notification channel.
pub struct Ledger<S> {
  inner: Arc<Inner<S>>,
}

impl<S> Clone for Ledger<S> {
  fn clone(&self) -> Self {
    Self { inner: Arc::clone(&self.inner) }
  }
}

impl<S: ShipmentStore> Ledger<S> {
  /// Open a ledger over `store` with `owner` as the designated owner
  /// identity.
  ///
  /// Bootstraps the owner as a supplier with details `"owner"` unless the
  /// backend already knows the identity — reopening a durable store must
  /// not mint a second owner id.
  pub async fn open(store: S, owner: ActorId) -> Result<Self> {
    let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let ledger = Self {
      inner: Arc::new(Inner {
        store,
        owner,
        events,
        write_lock: Mutex::new(()),
      }),
    };

    if ledger.lookup_supplier(&ledger.inner.owner).await?.is_none() {
      let owner = ledger.inner.owner.clone();
      ledger.register_unlocked(owner, "owner".to_string()).await?;
    }

    Ok(ledger)
  }

  /// The designated owner identity, fixed at [`Ledger::open`].
  pub fn owner(&self) -> &ActorId {
    &self.inner.owner
  }

  /// Subscribe to the notification feed. Only events emitted after this
  /// call are delivered.
  pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
    self.inner.events.subscribe()
  }

  fn emit(&self, event: LedgerEvent) {
    // A send error only means nobody is subscribed right now.
    let _ = self.inner.events.send(event);
  }

  // ── Identity registry ───────────────────────────────────────────────────

  /// Register `identity` as a supplier. Owner only.
  ///
  /// Re-registering an identity that already holds an id assigns a fresh
  /// id and repoints the identity at it; the old id stays valid for any
  /// records already written under it. Intentional quirk, kept from the
  /// original design.
  pub async fn register_supplier(
    &self,
    caller: &ActorId,
    identity: ActorId,
    details: String,
  ) -> Result<Supplier> {
    if caller != &self.inner.owner {
      return Err(Error::Unauthorized(caller.clone()));
    }
    let _guard = self.inner.write_lock.lock().await;
    self.register_unlocked(identity, details).await
  }

  /// Registration body, shared with the bootstrap path (which runs before
  /// any other handle exists and therefore skips the write lock).
  async fn register_unlocked(
    &self,
    identity: ActorId,
    details: String,
  ) -> Result<Supplier> {
    let supplier = self
      .inner
      .store
      .insert_supplier(identity, details, Utc::now())
      .await
      .map_err(box_store)?;

    self.emit(LedgerEvent::SupplierRegistered {
      id:       supplier.id,
      identity: supplier.identity.clone(),
      details:  supplier.details.clone(),
    });
    Ok(supplier)
  }

  /// Resolve an identity to its current supplier id. `None` means
  /// unregistered.
  pub async fn lookup_supplier(
    &self,
    identity: &ActorId,
  ) -> Result<Option<SupplierId>> {
    self.inner.store.supplier_id(identity).await.map_err(box_store)
  }

  // ── Access controller ───────────────────────────────────────────────────

  /// Owner-or-registered-supplier check for privileged writes.
  ///
  /// Re-derives the supplier id through the registry on every call; the
  /// mapping can change between calls (re-registration), so nothing is
  /// cached. The owner is registered at [`Ledger::open`]; should a backend
  /// ever lose that row, the owner is rejected rather than written under a
  /// made-up id.
  pub async fn authorize_supplier_write(
    &self,
    caller: &ActorId,
  ) -> Result<SupplierId> {
    match self.lookup_supplier(caller).await? {
      Some(id) => Ok(id),
      None => Err(Error::Unauthorized(caller.clone())),
    }
  }

  // ── Shipment ledger ─────────────────────────────────────────────────────

  /// Record that the calling supplier received `item`, storing the SHA-256
  /// of `metadata` as tamper evidence. Write-once per (item, supplier):
  /// a second recording fails with [`Error::AlreadyRecorded`] and leaves
  /// the original hash untouched.
  pub async fn record_receipt(
    &self,
    caller: &ActorId,
    item: ItemId,
    metadata: &str,
  ) -> Result<Digest> {
    let _guard = self.inner.write_lock.lock().await;

    let supplier = self.authorize_supplier_write(caller).await?;
    let content_hash = Digest::of(metadata.as_bytes());

    let existing = self
      .inner
      .store
      .shipment(item, supplier)
      .await
      .map_err(box_store)?;
    if existing.is_some_and(|r| r.content_hash.is_some()) {
      return Err(Error::AlreadyRecorded { item, supplier });
    }

    self
      .inner
      .store
      .set_receipt(item, supplier, content_hash, Utc::now())
      .await
      .map_err(box_store)?;

    self.emit(LedgerEvent::ShipmentReceived {
      item,
      caller: caller.clone(),
      content_hash,
      metadata: metadata.to_string(),
    });
    Ok(content_hash)
  }

  /// Content hash recorded for (item, supplier); `None` if no receipt has
  /// been recorded, including for witness-only records.
  pub async fn receipt_hash(
    &self,
    item: ItemId,
    supplier: SupplierId,
  ) -> Result<Option<Digest>> {
    let record = self
      .inner
      .store
      .shipment(item, supplier)
      .await
      .map_err(box_store)?;
    Ok(record.and_then(|r| r.content_hash))
  }

  /// Number of distinct witnesses that named (item, supplier); 0 if none.
  pub async fn witness_count(
    &self,
    item: ItemId,
    supplier: SupplierId,
  ) -> Result<u64> {
    let record = self
      .inner
      .store
      .shipment(item, supplier)
      .await
      .map_err(box_store)?;
    Ok(record.map_or(0, |r| r.witness_count))
  }

  // ── Witness ledger ──────────────────────────────────────────────────────

  /// Attest that `supplier` received `item`. Open to any caller, at most
  /// once per (item, caller) — a second attestation fails with
  /// [`Error::AlreadyWitnessed`] even if it names a different supplier.
  ///
  /// The named supplier id is deliberately not validated against the
  /// registry, and the pair need not have a recorded receipt; witnessing
  /// then just bumps the counter on a hash-less record. Both are kept
  /// from the original design.
  pub async fn witness(
    &self,
    caller: &ActorId,
    item: ItemId,
    supplier: SupplierId,
    name_hash: Digest,
  ) -> Result<u64> {
    let _guard = self.inner.write_lock.lock().await;

    let existing = self
      .inner
      .store
      .witness(item, caller)
      .await
      .map_err(box_store)?;
    if existing.is_some() {
      return Err(Error::AlreadyWitnessed { item, witness: caller.clone() });
    }

    let count = self
      .inner
      .store
      .record_witness(WitnessRecord {
        item,
        witness: caller.clone(),
        name_hash,
        supplier,
        recorded_at: Utc::now(),
      })
      .await
      .map_err(box_store)?;

    self.emit(LedgerEvent::ShipmentWitnessed { item, supplier, name_hash });
    Ok(count)
  }

  /// The attestation `witness` made for `item`, if any.
  pub async fn witness_info(
    &self,
    item: ItemId,
    witness: &ActorId,
  ) -> Result<Option<WitnessRecord>> {
    self.inner.store.witness(item, witness).await.map_err(box_store)
  }
}

fn box_store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}
