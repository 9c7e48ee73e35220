//! [`SqliteStore`] — the SQLite implementation of [`ShipmentStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tally_core::{
  identity::{ActorId, ItemId, SupplierId},
  record::{Digest, ShipmentRecord, Supplier, WitnessRecord},
  store::ShipmentStore,
};

use crate::{
  Error, Result,
  encode::{
    RawShipment, RawWitness, decode_id, encode_dt, encode_digest, encode_id,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally shipment store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Business
/// rules (write-once, duplicate attestations, authorization) live in
/// `tally_core::ledger::Ledger`; this type only persists rows.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ShipmentStore impl ──────────────────────────────────────────────────────

impl ShipmentStore for SqliteStore {
  type Error = Error;

  // ── Suppliers ─────────────────────────────────────────────────────────

  async fn insert_supplier(
    &self,
    identity: ActorId,
    details: String,
    registered_at: DateTime<Utc>,
  ) -> Result<Supplier> {
    let identity_str = identity.0.clone();
    let details_str = details.clone();
    let at_str = encode_dt(registered_at);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO suppliers (identity, details, registered_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![identity_str, details_str, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Supplier {
      id: SupplierId(decode_id(id)),
      identity,
      details,
      registered_at,
    })
  }

  async fn supplier_id(&self, identity: &ActorId) -> Result<Option<SupplierId>> {
    let identity_str = identity.0.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              // Highest id wins: re-registration inserts a newer row.
              "SELECT id FROM suppliers WHERE identity = ?1
               ORDER BY id DESC LIMIT 1",
              rusqlite::params![identity_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(id.map(|raw| SupplierId(decode_id(raw))))
  }

  // ── Shipments ─────────────────────────────────────────────────────────

  async fn shipment(
    &self,
    item: ItemId,
    supplier: SupplierId,
  ) -> Result<Option<ShipmentRecord>> {
    let item_raw = encode_id(item.0);
    let supplier_raw = encode_id(supplier.0);

    let raw: Option<RawShipment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT item_id, supplier_id, content_hash, witness_count, recorded_at
               FROM shipments WHERE item_id = ?1 AND supplier_id = ?2",
              rusqlite::params![item_raw, supplier_raw],
              |row| {
                Ok(RawShipment {
                  item_id:       row.get(0)?,
                  supplier_id:   row.get(1)?,
                  content_hash:  row.get(2)?,
                  witness_count: row.get(3)?,
                  recorded_at:   row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawShipment::into_record).transpose()
  }

  async fn set_receipt(
    &self,
    item: ItemId,
    supplier: SupplierId,
    content_hash: Digest,
    recorded_at: DateTime<Utc>,
  ) -> Result<()> {
    let item_raw = encode_id(item.0);
    let supplier_raw = encode_id(supplier.0);
    let hash_str = encode_digest(content_hash);
    let at_str = encode_dt(recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          // Witness-only rows already exist for some pairs; setting the
          // hash must not reset their counter.
          "INSERT INTO shipments (item_id, supplier_id, content_hash, witness_count, recorded_at)
           VALUES (?1, ?2, ?3, 0, ?4)
           ON CONFLICT (item_id, supplier_id) DO UPDATE SET
             content_hash = excluded.content_hash,
             recorded_at  = excluded.recorded_at",
          rusqlite::params![item_raw, supplier_raw, hash_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Witnesses ─────────────────────────────────────────────────────────

  async fn witness(
    &self,
    item: ItemId,
    witness: &ActorId,
  ) -> Result<Option<WitnessRecord>> {
    let item_raw = encode_id(item.0);
    let witness_str = witness.0.clone();

    let raw: Option<RawWitness> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT item_id, witness, name_hash, supplier_id, recorded_at
               FROM witnesses WHERE item_id = ?1 AND witness = ?2",
              rusqlite::params![item_raw, witness_str],
              |row| {
                Ok(RawWitness {
                  item_id:     row.get(0)?,
                  witness:     row.get(1)?,
                  name_hash:   row.get(2)?,
                  supplier_id: row.get(3)?,
                  recorded_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWitness::into_record).transpose()
  }

  async fn record_witness(&self, record: WitnessRecord) -> Result<u64> {
    let item_raw = encode_id(record.item.0);
    let supplier_raw = encode_id(record.supplier.0);
    let witness_str = record.witness.0.clone();
    let hash_str = encode_digest(record.name_hash);
    let at_str = encode_dt(record.recorded_at);

    let count: i64 = self
      .conn
      .call(move |conn| {
        // Counter bump and attestation row commit together or not at all.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO shipments (item_id, supplier_id, content_hash, witness_count, recorded_at)
           VALUES (?1, ?2, NULL, 1, NULL)
           ON CONFLICT (item_id, supplier_id) DO UPDATE SET
             witness_count = witness_count + 1",
          rusqlite::params![item_raw, supplier_raw],
        )?;
        let count: i64 = tx.query_row(
          "SELECT witness_count FROM shipments
           WHERE item_id = ?1 AND supplier_id = ?2",
          rusqlite::params![item_raw, supplier_raw],
          |row| row.get(0),
        )?;
        tx.execute(
          "INSERT INTO witnesses (item_id, witness, name_hash, supplier_id, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![item_raw, witness_str, hash_str, supplier_raw, at_str],
        )?;
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(decode_id(count))
  }
}
