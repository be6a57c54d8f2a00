//! SQL schema for the Rollcall document store.
//!
//! Every collection has the same shape: a store-assigned `id`, a fixed-width
//! `created_at` used for ordering, and the JSON document itself.

use serde::Deserialize;

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS students (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    doc         TEXT NOT NULL CHECK (json_valid(doc))
);

CREATE TABLE IF NOT EXISTS announcements (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    doc         TEXT NOT NULL CHECK (json_valid(doc))
);

CREATE TABLE IF NOT EXISTS student_messages (
    id          TEXT PRIMARY KEY,
    created_at  TEXT NOT NULL,
    doc         TEXT NOT NULL CHECK (json_valid(doc))
);

CREATE INDEX IF NOT EXISTS announcements_created_idx    ON announcements(created_at);
CREATE INDEX IF NOT EXISTS student_messages_created_idx ON student_messages(created_at);

PRAGMA user_version = 1;
";

/// Name of the unique index over `(date, subject_name)`.
pub const ATTENDANCE_KEY_INDEX: &str = "students_date_subject_uidx";

pub const CREATE_ATTENDANCE_KEY_INDEX: &str = "
CREATE UNIQUE INDEX IF NOT EXISTS students_date_subject_uidx ON students (
    json_extract(doc, '$.date'),
    json_extract(doc, '$.subject_name')
);
";

pub const DROP_ATTENDANCE_KEY_INDEX: &str =
  "DROP INDEX IF EXISTS students_date_subject_uidx;";

/// How [`SqliteStore::provision_indexes`](crate::SqliteStore::provision_indexes)
/// treats an existing uniqueness index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
  /// Create the index only if it is missing.
  #[default]
  Ensure,
  /// Drop and recreate the index unconditionally.
  Rebuild,
}
