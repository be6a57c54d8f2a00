//! Error type for `rollcall-store-sqlite`.

use std::time::Duration;

use rollcall_core::{ErrorKind, StoreError};
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] rollcall_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("timed out after {0:?} opening the store")]
  Timeout(Duration),

  /// A unique index rejected a write to a collection that has no key.
  #[error("unexpected uniqueness violation in {0}")]
  UnexpectedConflict(&'static str),
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Timeout(_) => ErrorKind::Unavailable,
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        ErrorKind::Unavailable
      }
      Error::Database(tokio_rusqlite::Error::Rusqlite(
        rusqlite::Error::SqliteFailure(e, _),
      )) if matches!(
        e.code,
        ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
      ) =>
      {
        ErrorKind::Unavailable
      }
      Error::Database(_) | Error::Json(_) | Error::UnexpectedConflict(_) => {
        ErrorKind::Internal
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
