//! The `RollStore` trait.
//!
//! Implemented by storage backends (e.g. `rollcall-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  announcement::{Announcement, NewAnnouncement},
  attendance::{AttendanceKey, AttendanceRecord, NewAttendance},
  error::StoreError,
  message::{MessageId, NewMessage, StudentMessage},
};

/// Abstraction over the three Rollcall collections.
///
/// Every operation is a single round trip to the store. Errors are reported
/// through [`StoreError::kind`] so callers can tell a conflict or a missing
/// document apart from a backend failure.
pub trait RollStore: Send + Sync {
  type Error: StoreError;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Insert a record, failing with a conflict if `(subject_name, date)` is
  /// already taken. The check and the insert are one atomic operation.
  fn create_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  /// Set `is_present` on the record identified by `key` and return the
  /// updated record. Fails with not-found if there is no such record.
  fn update_presence(
    &self,
    key: AttendanceKey,
    is_present: bool,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  /// All records whose date equals `date`, in store order.
  fn list_attendance(
    &self,
    date: String,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  /// Delete every attendance record, returning how many were removed.
  fn clear_attendance(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Announcements ─────────────────────────────────────────────────────

  fn create_announcement(
    &self,
    input: NewAnnouncement,
  ) -> impl Future<Output = Result<Announcement, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_announcements(
    &self,
  ) -> impl Future<Output = Result<Vec<Announcement>, Self::Error>> + Send + '_;

  fn clear_announcements(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Messages ──────────────────────────────────────────────────────────

  /// Persist a message; the store assigns its identifier.
  fn create_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<StudentMessage, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_messages(
    &self,
  ) -> impl Future<Output = Result<Vec<StudentMessage>, Self::Error>> + Send + '_;

  /// Remove exactly the message with `id`. Fails with not-found otherwise.
  fn delete_message(
    &self,
    id: MessageId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Liveness ──────────────────────────────────────────────────────────

  /// Round-trip to the store; fails with an unavailable error if it is down.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
