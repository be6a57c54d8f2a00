//! Rollcall server: configuration, store bootstrap, and the HTTP stack.
//!
//! The binary in `main.rs` wires these together; tests drive them directly.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use axum::{
  Router,
  http::{
    HeaderName, HeaderValue,
    header::{self, InvalidHeaderValue},
  },
};
use rollcall_api::{AppState, ClearPolicy};
use rollcall_core::store::RollStore;
use rollcall_store_sqlite::{IndexMode, SqliteStore};
use serde::Deserialize;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `ROLLCALL_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// SQLite file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// Bound on opening the store and on waiting for a locked database.
  #[serde(default = "default_connect_timeout_secs")]
  pub connect_timeout_secs: u64,
  #[serde(default)]
  pub index_mode:           IndexMode,
  #[serde(default)]
  pub clear_policy:         ClearPolicy,
  /// Origins allowed by CORS; comma-separated when set from the environment.
  #[serde(default = "default_allowed_origins")]
  pub allowed_origins:      Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("rollcall.db") }

fn default_connect_timeout_secs() -> u64 { 5 }

fn default_allowed_origins() -> Vec<String> {
  vec![
    "http://localhost:5173".to_owned(),
    "http://127.0.0.1:5173".to_owned(),
  ]
}

impl ServerConfig {
  /// Read `path` (if it exists), then overlay `ROLLCALL_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, None)
  }

  /// Like [`ServerConfig::load`], but reads variables from `vars` instead of
  /// the process environment when given.
  pub fn load_with_env(
    path: &Path,
    vars: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ROLLCALL")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("allowed_origins")
          .source(vars),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn connect_timeout(&self) -> Duration {
    Duration::from_secs(self.connect_timeout_secs)
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
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

// ─── Bootstrap ────────────────────────────────────────────────────────────────

/// Open the store, check it answers, and provision the uniqueness index.
///
/// Failing to open or ping is an error. Failing to provision the index is
/// logged and tolerated: the server still starts, but attendance creation
/// will not reject duplicates until the index exists.
pub async fn bootstrap(cfg: &ServerConfig) -> rollcall_store_sqlite::Result<SqliteStore> {
  let path = cfg.store_path();
  let store = SqliteStore::connect(&path, cfg.connect_timeout()).await?;
  store.ping().await?;
  tracing::info!(path = %path.display(), "store connected");

  if let Err(e) = store.provision_indexes(cfg.index_mode).await {
    tracing::error!(error = %e, "index provisioning failed");
  }
  Ok(store)
}

// ─── HTTP stack ───────────────────────────────────────────────────────────────

/// Response headers readable by browser scripts. With credentials enabled a
/// `*` wildcard is not honoured, so they are listed.
const EXPOSED_HEADERS: [HeaderName; 4] = [
  header::CONTENT_TYPE,
  header::CONTENT_LENGTH,
  header::DATE,
  header::VARY,
];

/// CORS for the configured origins: credentials allowed, any method and
/// header the browser asks for.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o))
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .expose_headers(EXPOSED_HEADERS)
      .allow_credentials(true),
  )
}

/// The API router wrapped in request tracing and CORS.
pub fn app<S>(state: AppState<S>, cfg: &ServerConfig) -> Result<Router, InvalidHeaderValue>
where
  S: RollStore + Clone + 'static,
{
  Ok(
    rollcall_api::api_router(state)
      .layer(TraceLayer::new_for_http())
      .layer(cors_layer(&cfg.allowed_origins)?),
  )
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
    () = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
