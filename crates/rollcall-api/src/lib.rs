//! JSON REST API for Rollcall.
//!
//! Exposes an axum [`Router`] backed by any [`rollcall_core::store::RollStore`].
//! CORS, tracing layers, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rollcall_api::api_router(AppState::new(store, ClearPolicy::default()));
//! ```

pub mod announcements;
pub mod error;
pub mod health;
pub mod messages;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use rollcall_core::store::RollStore;
use serde::{Deserialize, Serialize};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S: RollStore> {
  pub store:        Arc<S>,
  pub clear_policy: ClearPolicy,
}

impl<S: RollStore> AppState<S> {
  pub fn new(store: S, clear_policy: ClearPolicy) -> Self {
    Self { store: Arc::new(store), clear_policy }
  }
}

// ─── Clear policy ─────────────────────────────────────────────────────────────

/// What a bulk clear of an already-empty collection reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
  /// 404: nothing was there to delete.
  #[default]
  NotFoundWhenEmpty,
  /// 200 with `deleted_count: 0`.
  AllowEmpty,
}

impl ClearPolicy {
  fn check(self, deleted: u64, empty_detail: &str) -> Result<(), ApiError> {
    if deleted == 0 && self == ClearPolicy::NotFoundWhenEmpty {
      return Err(ApiError::NotFound(empty_detail.to_owned()));
    }
    Ok(())
  }
}

/// Body returned by the bulk-clear endpoints.
#[derive(Debug, Serialize)]
pub struct Cleared {
  pub message:       &'static str,
  pub deleted_count: u64,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
///
/// The returned `Router<()>` can be nested or layered by the caller.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RollStore + Clone + 'static,
{
  Router::new()
    // Attendance
    .route("/students", post(students::create::<S>).delete(students::clear::<S>))
    .route("/students/{date}", get(students::list_for_date::<S>))
    .route("/students/{name}/{date}", put(students::update_presence::<S>))
    // Announcements
    .route(
      "/announcements",
      get(announcements::list::<S>)
        .post(announcements::create::<S>)
        .delete(announcements::clear::<S>),
    )
    // Messages
    .route(
      "/student-messages",
      get(messages::list::<S>).post(messages::create::<S>),
    )
    .route("/student-messages/{id}", delete(messages::delete_one::<S>))
    // Liveness
    .route("/health", get(health::handler::<S>))
    .with_state(state)
}
