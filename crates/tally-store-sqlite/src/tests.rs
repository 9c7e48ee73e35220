//! Integration tests for `SqliteStore` against an in-memory database, plus
//! durability tests against a temp file.

use chrono::Utc;
use tally_core::{
  identity::{ActorId, ItemId, SupplierId},
  ledger::Ledger,
  record::{Digest, WitnessRecord},
  store::ShipmentStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn witness_record(item: u64, witness: &str, supplier: u64) -> WitnessRecord {
  WitnessRecord {
    item:        ItemId(item),
    witness:     ActorId::new(witness),
    name_hash:   Digest::of(witness.as_bytes()),
    supplier:    SupplierId(supplier),
    recorded_at: Utc::now(),
  }
}

// ─── Suppliers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_supplier_assigns_sequential_ids() {
  let s = store().await;

  let a = s
    .insert_supplier(ActorId::new("0xa"), "alpha".into(), Utc::now())
    .await
    .unwrap();
  let b = s
    .insert_supplier(ActorId::new("0xb"), "bravo".into(), Utc::now())
    .await
    .unwrap();

  assert_eq!(a.id, SupplierId(1));
  assert_eq!(b.id, SupplierId(2));
}

#[tokio::test]
async fn supplier_id_unknown_returns_none() {
  let s = store().await;
  let id = s.supplier_id(&ActorId::new("0xnobody")).await.unwrap();
  assert!(id.is_none());
}

#[tokio::test]
async fn supplier_id_resolves_latest_registration() {
  let s = store().await;
  let a = ActorId::new("0xa");

  let first = s
    .insert_supplier(a.clone(), "depot".into(), Utc::now())
    .await
    .unwrap();
  let second = s
    .insert_supplier(a.clone(), "depot again".into(), Utc::now())
    .await
    .unwrap();

  assert_ne!(first.id, second.id);
  assert_eq!(s.supplier_id(&a).await.unwrap(), Some(second.id));
}

// ─── Shipments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn shipment_absent_returns_none() {
  let s = store().await;
  let record = s.shipment(ItemId(1), SupplierId(1)).await.unwrap();
  assert!(record.is_none());
}

#[tokio::test]
async fn set_receipt_then_read_back() {
  let s = store().await;
  let hash = Digest::of(b"box1");

  s.set_receipt(ItemId(7), SupplierId(2), hash, Utc::now())
    .await
    .unwrap();

  let record = s.shipment(ItemId(7), SupplierId(2)).await.unwrap().unwrap();
  assert_eq!(record.item, ItemId(7));
  assert_eq!(record.supplier, SupplierId(2));
  assert_eq!(record.content_hash, Some(hash));
  assert_eq!(record.witness_count, 0);
  assert!(record.recorded_at.is_some());
}

#[tokio::test]
async fn set_receipt_preserves_witness_count() {
  let s = store().await;

  s.record_witness(witness_record(7, "0xw", 2)).await.unwrap();
  s.set_receipt(ItemId(7), SupplierId(2), Digest::of(b"box1"), Utc::now())
    .await
    .unwrap();

  let record = s.shipment(ItemId(7), SupplierId(2)).await.unwrap().unwrap();
  assert_eq!(record.witness_count, 1);
  assert!(record.content_hash.is_some());
}

// ─── Witnesses ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_witness_creates_hashless_row_and_counts() {
  let s = store().await;

  let count = s.record_witness(witness_record(7, "0xw1", 2)).await.unwrap();
  assert_eq!(count, 1);
  let count = s.record_witness(witness_record(7, "0xw2", 2)).await.unwrap();
  assert_eq!(count, 2);

  let record = s.shipment(ItemId(7), SupplierId(2)).await.unwrap().unwrap();
  assert_eq!(record.content_hash, None);
  assert_eq!(record.recorded_at, None);
  assert_eq!(record.witness_count, 2);
}

#[tokio::test]
async fn witness_read_back() {
  let s = store().await;
  let input = witness_record(7, "0xw", 2);

  s.record_witness(input.clone()).await.unwrap();

  let record = s
    .witness(ItemId(7), &ActorId::new("0xw"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(record.name_hash, input.name_hash);
  assert_eq!(record.supplier, SupplierId(2));

  let absent = s.witness(ItemId(7), &ActorId::new("0xother")).await.unwrap();
  assert!(absent.is_none());
}

// ─── Ledger over SQLite ──────────────────────────────────────────────────────

#[tokio::test]
async fn ledger_scenario_over_sqlite() {
  let owner = ActorId::new("0xowner");
  let ledger = Ledger::open(store().await, owner.clone()).await.unwrap();

  assert_eq!(
    ledger.lookup_supplier(&owner).await.unwrap(),
    Some(SupplierId(1))
  );

  let a = ActorId::new("0xa");
  let supplier = ledger
    .register_supplier(&owner, a.clone(), "depot".into())
    .await
    .unwrap();
  assert_eq!(supplier.id, SupplierId(2));

  let hash = ledger.record_receipt(&a, ItemId(7), "box1").await.unwrap();
  assert!(ledger.record_receipt(&a, ItemId(7), "dup").await.is_err());

  ledger
    .witness(&ActorId::new("0xw"), ItemId(7), supplier.id, Digest::of(b"w1"))
    .await
    .unwrap();

  assert_eq!(
    ledger.receipt_hash(ItemId(7), supplier.id).await.unwrap(),
    Some(hash)
  );
  assert_eq!(ledger.witness_count(ItemId(7), supplier.id).await.unwrap(), 1);
}

#[tokio::test]
async fn reopen_preserves_state_and_owner_id() {
  let path = std::env::temp_dir().join("tally-store-sqlite-reopen-test.db");
  for suffix in ["", "-wal", "-shm"] {
    let mut p = path.clone().into_os_string();
    p.push(suffix);
    let _ = std::fs::remove_file(p);
  }

  let owner = ActorId::new("0xowner");
  let hash;
  {
    let ledger = Ledger::open(
      SqliteStore::open(&path).await.unwrap(),
      owner.clone(),
    )
    .await
    .unwrap();
    hash = ledger.record_receipt(&owner, ItemId(1), "pallet").await.unwrap();
  }

  // Reopen: the owner must keep id 1, not get re-registered under id 2.
  let ledger = Ledger::open(
    SqliteStore::open(&path).await.unwrap(),
    owner.clone(),
  )
  .await
  .unwrap();

  assert_eq!(ledger.lookup_supplier(&owner).await.unwrap(), Some(SupplierId(1)));
  assert_eq!(
    ledger.receipt_hash(ItemId(1), SupplierId(1)).await.unwrap(),
    Some(hash)
  );

  let next = ledger
    .register_supplier(&owner, ActorId::new("0xa"), "depot".into())
    .await
    .unwrap();
  assert_eq!(next.id, SupplierId(2));
}
