//! [`SqliteStore`] — the SQLite implementation of [`RollStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use serde::Serialize;

use rollcall_core::{
  announcement::{Announcement, NewAnnouncement},
  attendance::{AttendanceKey, AttendanceRecord, NewAttendance},
  message::{MessageId, NewMessage, StudentMessage},
  store::RollStore,
};

use crate::{
  encode::{decode_doc, decode_docs, encode_doc, encode_dt, new_id, now},
  schema::{
    ATTENDANCE_KEY_INDEX, CREATE_ATTENDANCE_KEY_INDEX, DROP_ATTENDANCE_KEY_INDEX,
    IndexMode, SCHEMA,
  },
  Error, Result,
};

const STUDENTS: &str = "students";
const ANNOUNCEMENTS: &str = "announcements";
const MESSAGES: &str = "student_messages";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rollcall document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The store
/// stays open until [`SqliteStore::close`] is called or the last clone drops.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and create the collection tables.
  ///
  /// The uniqueness index is not touched; see
  /// [`SqliteStore::provision_indexes`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Like [`SqliteStore::open`], but gives up after `timeout` and waits at
  /// most `timeout` on a locked database for every later statement.
  pub async fn connect(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
    let conn = tokio::time::timeout(timeout, tokio_rusqlite::Connection::open(path))
      .await
      .map_err(|_| Error::Timeout(timeout))??;

    conn
      .call(move |conn| {
        conn.busy_timeout(timeout)?;
        Ok(())
      })
      .await?;

    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Install the unique index on `(date, subject_name)`.
  ///
  /// Fails if existing documents already violate the constraint. Until this
  /// succeeds, attendance creation does not reject duplicates.
  pub async fn provision_indexes(&self, mode: IndexMode) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if mode == IndexMode::Rebuild {
          tx.execute_batch(DROP_ATTENDANCE_KEY_INDEX)?;
        }
        tx.execute_batch(CREATE_ATTENDANCE_KEY_INDEX)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(index = ATTENDANCE_KEY_INDEX, ?mode, "index provisioned");
    Ok(())
  }

  /// Shut down the connection thread. Other clones fail with an unavailable
  /// error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  /// Insert one document into a collection without a uniqueness constraint.
  async fn insert_doc<T: Serialize>(
    &self,
    table: &'static str,
    id: String,
    created_at: DateTime<Utc>,
    doc: &T,
  ) -> Result<()> {
    if !self.try_insert_doc(table, id, created_at, doc).await? {
      return Err(Error::UnexpectedConflict(table));
    }
    Ok(())
  }

  /// Insert one document. Returns `false` if a unique index rejected it.
  async fn try_insert_doc<T: Serialize>(
    &self,
    table: &'static str,
    id: String,
    created_at: DateTime<Utc>,
    doc: &T,
  ) -> Result<bool> {
    let at_str = encode_dt(created_at);
    let doc_str = encode_doc(doc)?;

    let inserted = self
      .conn
      .call(move |conn| {
        let sql = format!("INSERT INTO {table} (id, created_at, doc) VALUES (?1, ?2, ?3)");
        match conn.execute(&sql, rusqlite::params![id, at_str, doc_str]) {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(inserted)
  }

  /// Every document in `table`, newest first.
  async fn newest_first(&self, table: &'static str) -> Result<Vec<String>> {
    let raws = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT doc FROM {table} ORDER BY created_at DESC, rowid DESC");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws)
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn clear(&self, table: &'static str) -> Result<u64> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute(&format!("DELETE FROM {table}"), [])?))
      .await?;

    tracing::debug!(table, deleted, "collection cleared");
    Ok(deleted as u64)
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── RollStore impl ──────────────────────────────────────────────────────────

impl RollStore for SqliteStore {
  type Error = Error;

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn create_attendance(&self, input: NewAttendance) -> Result<AttendanceRecord> {
    input.validate()?;

    let record = input.into_record(now());
    let inserted = self
      .try_insert_doc(STUDENTS, new_id(), record.created_at, &record)
      .await?;

    if !inserted {
      return Err(rollcall_core::Error::DuplicateAttendance(record.key()).into());
    }
    Ok(record)
  }

  async fn update_presence(
    &self,
    key: AttendanceKey,
    is_present: bool,
  ) -> Result<AttendanceRecord> {
    let subject_name = key.subject_name.clone();
    let date = key.date.clone();
    let flag = if is_present { "true" } else { "false" };

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE students
             SET doc = json_set(doc, '$.is_present', json(?3))
             WHERE json_extract(doc, '$.date') = ?2
               AND json_extract(doc, '$.subject_name') = ?1
             RETURNING doc",
            rusqlite::params![subject_name, date, flag],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    match raw {
      Some(raw) => decode_doc(&raw),
      None => Err(rollcall_core::Error::AttendanceNotFound(key).into()),
    }
  }

  async fn list_attendance(&self, date: String) -> Result<Vec<AttendanceRecord>> {
    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT doc FROM students
           WHERE json_extract(doc, '$.date') = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![date], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    decode_docs(raws)
  }

  async fn clear_attendance(&self) -> Result<u64> { self.clear(STUDENTS).await }

  // ── Announcements ─────────────────────────────────────────────────────────

  async fn create_announcement(&self, input: NewAnnouncement) -> Result<Announcement> {
    input.validate()?;

    let announcement = input.into_announcement(now());
    self
      .insert_doc(ANNOUNCEMENTS, new_id(), announcement.created_at, &announcement)
      .await?;
    Ok(announcement)
  }

  async fn list_announcements(&self) -> Result<Vec<Announcement>> {
    decode_docs(self.newest_first(ANNOUNCEMENTS).await?)
  }

  async fn clear_announcements(&self) -> Result<u64> { self.clear(ANNOUNCEMENTS).await }

  // ── Messages ──────────────────────────────────────────────────────────────

  async fn create_message(&self, input: NewMessage) -> Result<StudentMessage> {
    input.validate()?;

    let id = new_id();
    let message = input.into_message(MessageId::from(id.clone()), now());
    self
      .insert_doc(MESSAGES, id, message.created_at, &message)
      .await?;
    Ok(message)
  }

  async fn list_messages(&self) -> Result<Vec<StudentMessage>> {
    decode_docs(self.newest_first(MESSAGES).await?)
  }

  async fn delete_message(&self, id: MessageId) -> Result<()> {
    let id_str = id.as_str().to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM student_messages WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(rollcall_core::Error::MessageNotFound(id).into());
    }
    Ok(())
  }

  // ── Liveness ──────────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
