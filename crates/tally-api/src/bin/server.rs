//! `tallyd` — the Tally checkpoint-store server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite-backed ledger, and serves the JSON API over HTTP. Every ledger
//! notification is also logged through `tracing` so an operator can follow
//! the feed without attaching to `/events`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tally_api::ServerConfig;
use tally_core::{identity::ActorId, ledger::Ledger};
use tally_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError};
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Tally shipment checkpoint server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TALLY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open the store and bootstrap the ledger (registers the owner as
  // supplier 1 on first open).
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let owner = ActorId::new(server_cfg.owner.clone());
  let ledger = Ledger::open(store, owner)
    .await
    .context("failed to open ledger")?;

  spawn_event_log(&ledger);

  let app = tally_api::api_router(ledger).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Mirror every ledger notification into the log.
fn spawn_event_log(ledger: &Ledger<SqliteStore>) {
  let mut events = ledger.subscribe();
  tokio::spawn(async move {
    loop {
      match events.recv().await {
        Ok(event) => tracing::info!(?event, "ledger event"),
        Err(RecvError::Lagged(skipped)) => {
          tracing::warn!(skipped, "event log fell behind");
        }
        Err(RecvError::Closed) => break,
      }
    }
  });
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
