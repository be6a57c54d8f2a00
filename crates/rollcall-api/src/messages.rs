//! Handlers for `/student-messages`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/student-messages` | Body: [`NewMessage`]; `sender` defaults to `"Anonymous"` |
//! | `GET`    | `/student-messages` | Newest first |
//! | `DELETE` | `/student-messages/{id}` | 404 if the id is unknown |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rollcall_core::{
  message::{MessageId, NewMessage, StudentMessage},
  store::RollStore,
};
use serde_json::{Value, json};

use crate::{
  AppState,
  error::{ApiError, Params, Payload},
};

/// `POST /student-messages`
pub async fn create<S: RollStore>(
  State(state): State<AppState<S>>,
  Payload(body): Payload<NewMessage>,
) -> Result<impl IntoResponse, ApiError> {
  let message = state
    .store
    .create_message(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /student-messages`
pub async fn list<S: RollStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<StudentMessage>>, ApiError> {
  let messages = state
    .store
    .list_messages()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(messages))
}

/// `DELETE /student-messages/{id}`
pub async fn delete_one<S: RollStore>(
  State(state): State<AppState<S>>,
  Params(id): Params<String>,
) -> Result<Json<Value>, ApiError> {
  state
    .store
    .delete_message(MessageId::from(id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "status": "deleted" })))
}
