//! Handlers for `/suppliers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/suppliers` | Owner only; body carries the caller identity |
//! | `GET`  | `/suppliers/:identity` | `supplier_id` is `0` if unregistered |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tally_core::{
  identity::ActorId, ledger::Ledger, record::Supplier, store::ShipmentStore,
};

use crate::error::ApiError;

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub caller:   ActorId,
  pub identity: ActorId,
  pub details:  String,
}

/// `POST /suppliers` — body: `{"caller":"…","identity":"…","details":"…"}`
pub async fn register<S>(
  State(ledger): State<Ledger<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShipmentStore,
{
  let supplier: Supplier = ledger
    .register_supplier(&body.caller, body.identity, body.details)
    .await?;
  Ok((StatusCode::CREATED, Json(supplier)))
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LookupResponse {
  /// `0` means the identity is not registered — the zero id never denotes
  /// a real supplier.
  pub supplier_id: u64,
}

/// `GET /suppliers/:identity`
pub async fn lookup<S>(
  State(ledger): State<Ledger<S>>,
  Path(identity): Path<String>,
) -> Result<Json<LookupResponse>, ApiError>
where
  S: ShipmentStore,
{
  let id = ledger.lookup_supplier(&ActorId::new(identity)).await?;
  Ok(Json(LookupResponse { supplier_id: id.map_or(0, |id| id.0) }))
}
