//! Handlers for witness attestation and the witness reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/witnesses` | Open to anyone, once per (item, caller) |
//! | `GET`  | `/items/:item/suppliers/:supplier/witnesses` | Count, 0 if none |
//! | `GET`  | `/items/:item/witnesses/:identity` | Zero tuple if absent |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tally_core::{
  identity::{ActorId, ItemId, SupplierId},
  ledger::Ledger,
  record::Digest,
  store::ShipmentStore,
};

use crate::error::ApiError;

// ─── Attest ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AttestBody {
  pub caller:    ActorId,
  pub item:      ItemId,
  /// Not validated against the registry; naming a nonexistent supplier is
  /// accepted as-is.
  pub supplier:  SupplierId,
  pub name_hash: Digest,
}

#[derive(Debug, Serialize)]
pub struct AttestResponse {
  pub witness_count: u64,
}

/// `POST /witnesses` — body:
/// `{"caller":"…","item":7,"supplier":2,"name_hash":"<64 hex chars>"}`
pub async fn attest<S>(
  State(ledger): State<Ledger<S>>,
  Json(body): Json<AttestBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShipmentStore,
{
  let witness_count = ledger
    .witness(&body.caller, body.item, body.supplier, body.name_hash)
    .await?;
  Ok((StatusCode::CREATED, Json(AttestResponse { witness_count })))
}

// ─── Count ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CountResponse {
  pub witness_count: u64,
}

/// `GET /items/:item/suppliers/:supplier/witnesses`
pub async fn count<S>(
  State(ledger): State<Ledger<S>>,
  Path((item, supplier)): Path<(u64, u64)>,
) -> Result<Json<CountResponse>, ApiError>
where
  S: ShipmentStore,
{
  let witness_count = ledger
    .witness_count(ItemId(item), SupplierId(supplier))
    .await?;
  Ok(Json(CountResponse { witness_count }))
}

// ─── Info ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct InfoResponse {
  pub name_hash:   Digest,
  pub supplier_id: u64,
}

/// `GET /items/:item/witnesses/:identity`
///
/// The wire contract renders "no attestation" as the all-zero hash and
/// supplier id 0; internally absence is an `Option`, so a name hash that
/// legitimately equals zero still round-trips correctly.
pub async fn info<S>(
  State(ledger): State<Ledger<S>>,
  Path((item, identity)): Path<(u64, String)>,
) -> Result<Json<InfoResponse>, ApiError>
where
  S: ShipmentStore,
{
  let record = ledger
    .witness_info(ItemId(item), &ActorId::new(identity))
    .await?;
  let response = match record {
    Some(record) => InfoResponse {
      name_hash:   record.name_hash,
      supplier_id: record.supplier.0,
    },
    None => InfoResponse { name_hash: Digest([0; 32]), supplier_id: 0 },
  };
  Ok(Json(response))
}
