//! Handler for `GET /health`.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use rollcall_core::store::RollStore;
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:    &'static str,
  pub database:  &'static str,
  pub timestamp: DateTime<Utc>,
}

/// `GET /health` — 200 if the store answers a ping, 503 otherwise.
pub async fn handler<S: RollStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Health>, ApiError> {
  state
    .store
    .ping()
    .await
    .map_err(|e| ApiError::Unavailable(Box::new(e)))?;
  Ok(Json(Health {
    status:    "healthy",
    database:  "connected",
    timestamp: Utc::now(),
  }))
}
