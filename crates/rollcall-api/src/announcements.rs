//! Handlers for `/announcements`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rollcall_core::{
  announcement::{Announcement, NewAnnouncement},
  store::RollStore,
};

use crate::{
  AppState, Cleared,
  error::{ApiError, Payload},
};

/// `POST /announcements` — returns 201 + the stored announcement.
pub async fn create<S: RollStore>(
  State(state): State<AppState<S>>,
  Payload(body): Payload<NewAnnouncement>,
) -> Result<impl IntoResponse, ApiError> {
  let announcement = state
    .store
    .create_announcement(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(announcement)))
}

/// `GET /announcements` — newest first.
pub async fn list<S: RollStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
  let announcements = state
    .store
    .list_announcements()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(announcements))
}

/// `DELETE /announcements`
pub async fn clear<S: RollStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Cleared>, ApiError> {
  let deleted = state
    .store
    .clear_announcements()
    .await
    .map_err(ApiError::store)?;
  state
    .clear_policy
    .check(deleted, "No announcements found to delete")?;

  tracing::info!(deleted, "announcements cleared");
  Ok(Json(Cleared {
    message:       "All announcements have been cleared",
    deleted_count: deleted,
  }))
}
