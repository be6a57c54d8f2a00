//! Handlers for `/students` endpoints (attendance records).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/students` | Body: [`NewAttendance`]; 201, or 409 if `(subject_name, date)` exists |
//! | `PUT`    | `/students/{name}/{date}` | Body: `{"is_present": bool}`; 404 if no such record |
//! | `GET`    | `/students/{date}` | Records for that date |
//! | `DELETE` | `/students` | Clears every record; see [`ClearPolicy`](crate::ClearPolicy) |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rollcall_core::{
  attendance::{AttendanceKey, AttendanceRecord, NewAttendance},
  store::RollStore,
};
use serde::Deserialize;

use crate::{
  AppState, Cleared,
  error::{ApiError, Params, Payload},
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students`
pub async fn create<S: RollStore>(
  State(state): State<AppState<S>>,
  Payload(body): Payload<NewAttendance>,
) -> Result<impl IntoResponse, ApiError> {
  let record = state
    .store
    .create_attendance(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update presence ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PresenceBody {
  pub is_present: bool,
}

/// `PUT /students/{name}/{date}`
pub async fn update_presence<S: RollStore>(
  State(state): State<AppState<S>>,
  Params((name, date)): Params<(String, String)>,
  Payload(body): Payload<PresenceBody>,
) -> Result<Json<AttendanceRecord>, ApiError> {
  let record = state
    .store
    .update_presence(AttendanceKey::new(name, date), body.is_present)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(record))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /students/{date}`
pub async fn list_for_date<S: RollStore>(
  State(state): State<AppState<S>>,
  Params(date): Params<String>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
  let records = state
    .store
    .list_attendance(date)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Clear ────────────────────────────────────────────────────────────────────

/// `DELETE /students`
pub async fn clear<S: RollStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Cleared>, ApiError> {
  let deleted = state
    .store
    .clear_attendance()
    .await
    .map_err(ApiError::store)?;
  state
    .clear_policy
    .check(deleted, "No student records found to delete")?;

  tracing::info!(deleted, "attendance records cleared");
  Ok(Json(Cleared {
    message:       "All student records have been cleared",
    deleted_count: deleted,
  }))
}
