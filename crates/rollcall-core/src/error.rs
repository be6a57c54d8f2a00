//! Error taxonomy shared by every Rollcall crate.

use thiserror::Error;

use crate::{attendance::AttendanceKey, message::MessageId};

/// The coarse category of a failure, used by the API layer to pick a status
/// code without knowing which backend produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or incomplete payload, rejected before reaching the store.
  Validation,
  /// A uniqueness constraint rejected the write.
  Conflict,
  /// No matching document.
  NotFound,
  /// The store cannot be reached.
  Unavailable,
  Internal,
}

/// Implemented by every store backend's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{field} must not be blank")]
  Blank { field: &'static str },

  #[error(
    "attendance for {:?} on {:?} already exists",
    .0.subject_name,
    .0.date
  )]
  DuplicateAttendance(AttendanceKey),

  #[error("no attendance for {:?} on {:?}", .0.subject_name, .0.date)]
  AttendanceNotFound(AttendanceKey),

  #[error("message not found: {0}")]
  MessageNotFound(MessageId),
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Blank { .. } => ErrorKind::Validation,
      Error::DuplicateAttendance(_) => ErrorKind::Conflict,
      Error::AttendanceNotFound(_) | Error::MessageNotFound(_) => {
        ErrorKind::NotFound
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject empty or whitespace-only values.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Blank { field });
  }
  Ok(())
}
