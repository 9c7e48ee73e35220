//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and digests as lowercase hex.
//! Item and supplier ids are bit-cast to SQLite INTEGERs, so values beyond
//! `i64::MAX` survive the round trip.

use chrono::{DateTime, Utc};
use tally_core::{
  identity::{ActorId, ItemId, SupplierId},
  record::{Digest, ShipmentRecord, WitnessRecord},
};

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn encode_id(id: u64) -> i64 {
  id as i64
}

pub fn decode_id(raw: i64) -> u64 {
  raw as u64
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Digest ──────────────────────────────────────────────────────────────────

pub fn encode_digest(d: Digest) -> String {
  d.to_hex()
}

pub fn decode_digest(s: &str) -> Result<Digest> {
  Ok(Digest::from_hex(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read directly from a `shipments` row.
pub struct RawShipment {
  pub item_id:       i64,
  pub supplier_id:   i64,
  pub content_hash:  Option<String>,
  pub witness_count: i64,
  pub recorded_at:   Option<String>,
}

impl RawShipment {
  pub fn into_record(self) -> Result<ShipmentRecord> {
    Ok(ShipmentRecord {
      item:          ItemId(decode_id(self.item_id)),
      supplier:      SupplierId(decode_id(self.supplier_id)),
      content_hash:  self
        .content_hash
        .as_deref()
        .map(decode_digest)
        .transpose()?,
      witness_count: decode_id(self.witness_count),
      recorded_at:   self.recorded_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw columns read directly from a `witnesses` row.
pub struct RawWitness {
  pub item_id:     i64,
  pub witness:     String,
  pub name_hash:   String,
  pub supplier_id: i64,
  pub recorded_at: String,
}

impl RawWitness {
  pub fn into_record(self) -> Result<WitnessRecord> {
    Ok(WitnessRecord {
      item:        ItemId(decode_id(self.item_id)),
      witness:     ActorId(self.witness),
      name_hash:   decode_digest(&self.name_hash)?,
      supplier:    SupplierId(decode_id(self.supplier_id)),
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
