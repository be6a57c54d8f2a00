//! rollcall server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `ROLLCALL_*`
//! environment variables, opens the SQLite document store, and serves the
//! JSON API over HTTP until Ctrl-C or SIGTERM.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rollcall_api::AppState;
use rollcall_server::{ServerConfig, bootstrap, shutdown_signal};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rollcall attendance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = bootstrap(&cfg)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path()))?;

  let app = rollcall_server::app(AppState::new(store.clone(), cfg.clear_policy), &cfg)
    .context("invalid CORS origin in allowed_origins")?;

  let address = cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("store closed");
  Ok(())
}
