//! `GET /events` — server-sent stream of ledger notifications.
//!
//! Each SSE `data:` line is one JSON-encoded
//! [`tally_core::event::LedgerEvent`], in emission order. Indexers that
//! fall behind the broadcast buffer skip the gap and keep streaming; the
//! ledger itself remains the source of truth.

use std::convert::Infallible;

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{Stream, StreamExt as _, wrappers::BroadcastStream};

use tally_core::{ledger::Ledger, store::ShipmentStore};

pub async fn stream<S>(
  State(ledger): State<Ledger<S>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
  S: ShipmentStore,
{
  let stream = BroadcastStream::new(ledger.subscribe()).filter_map(|result| {
    // Err here is a lag notice, not a dead stream.
    let event = result.ok()?;
    let data = serde_json::to_string(&event).ok()?;
    Some(Ok(Event::default().data(data)))
  });
  Sse::new(stream).keep_alive(KeepAlive::default())
}
