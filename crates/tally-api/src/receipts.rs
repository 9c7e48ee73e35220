//! Handlers for receipt recording and the receipt-hash read.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/receipts` | Owner or registered supplier |
//! | `GET`  | `/items/:item/suppliers/:supplier/receipt` | `content_hash` null if unset |

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

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecordBody {
  pub caller:   ActorId,
  pub item:     ItemId,
  /// Opaque shipment metadata; the ledger stores only its SHA-256.
  pub metadata: String,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
  pub content_hash: Digest,
}

/// `POST /receipts` — body: `{"caller":"…","item":7,"metadata":"…"}`
pub async fn record<S>(
  State(ledger): State<Ledger<S>>,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShipmentStore,
{
  let content_hash = ledger
    .record_receipt(&body.caller, body.item, &body.metadata)
    .await?;
  Ok((StatusCode::CREATED, Json(RecordResponse { content_hash })))
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
  /// `null` until a receipt has been recorded for the pair.
  pub content_hash: Option<Digest>,
}

/// `GET /items/:item/suppliers/:supplier/receipt`
pub async fn receipt_hash<S>(
  State(ledger): State<Ledger<S>>,
  Path((item, supplier)): Path<(u64, u64)>,
) -> Result<Json<ReceiptResponse>, ApiError>
where
  S: ShipmentStore,
{
  let content_hash = ledger
    .receipt_hash(ItemId(item), SupplierId(supplier))
    .await?;
  Ok(Json(ReceiptResponse { content_hash }))
}
