//! Integration tests for `SqliteStore` against an in-memory database.

use rollcall_core::{
  ErrorKind, StoreError as _,
  announcement::NewAnnouncement,
  attendance::{AttendanceKey, NewAttendance},
  message::{MessageId, NewMessage},
  store::RollStore,
};

use crate::{Error, IndexMode, SqliteStore};

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.provision_indexes(IndexMode::Ensure)
    .await
    .expect("indexes");
  s
}

fn alice() -> NewAttendance { NewAttendance::new("Alice", "2024-01-01") }

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_duplicate_conflicts() {
  let s = store().await;

  let record = s.create_attendance(alice()).await.unwrap();
  assert_eq!(record.subject_name, "Alice");
  assert!(!record.is_present);

  let err = s.create_attendance(alice()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
  assert!(matches!(
    err,
    Error::Core(rollcall_core::Error::DuplicateAttendance(ref key))
      if *key == AttendanceKey::new("Alice", "2024-01-01")
  ));
}

#[tokio::test]
async fn same_subject_on_another_date_is_not_a_conflict() {
  let s = store().await;
  s.create_attendance(alice()).await.unwrap();
  s.create_attendance(NewAttendance::new("Alice", "2024-01-02"))
    .await
    .unwrap();
  s.create_attendance(NewAttendance::new("Bob", "2024-01-01"))
    .await
    .unwrap();
}

#[tokio::test]
async fn concurrent_identical_creates_admit_exactly_one() {
  let s = store().await;

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.create_attendance(alice()).await })
    })
    .collect();

  let mut created = 0;
  let mut conflicts = 0;
  for h in handles {
    match h.await.unwrap() {
      Ok(_) => created += 1,
      Err(e) => {
        assert_eq!(e.kind(), ErrorKind::Conflict);
        conflicts += 1;
      }
    }
  }
  assert_eq!(created, 1);
  assert_eq!(conflicts, 7);
  assert_eq!(s.list_attendance("2024-01-01".into()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn blank_fields_never_reach_the_table() {
  let s = store().await;
  let err = s
    .create_attendance(NewAttendance::new("", "2024-01-01"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(s.clear_attendance().await.unwrap(), 0);
}

#[tokio::test]
async fn update_presence_missing_is_not_found() {
  let s = store().await;
  let err = s
    .update_presence(AttendanceKey::new("Ghost", "2024-01-01"), true)
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_presence_is_idempotent() {
  let s = store().await;
  let created = s.create_attendance(alice()).await.unwrap();
  let key = created.key();

  let first = s.update_presence(key.clone(), true).await.unwrap();
  let second = s.update_presence(key.clone(), true).await.unwrap();
  assert!(first.is_present);
  assert_eq!(first, second);
  // Only the flag moves.
  assert_eq!(second.created_at, created.created_at);

  let back = s.update_presence(key, false).await.unwrap();
  assert!(!back.is_present);
}

#[tokio::test]
async fn list_by_date_returns_only_that_date() {
  let s = store().await;
  s.create_attendance(alice()).await.unwrap();
  s.create_attendance(NewAttendance::new("Bob", "2024-01-01"))
    .await
    .unwrap();
  s.create_attendance(NewAttendance::new("Alice", "2024-01-02"))
    .await
    .unwrap();

  let day = s.list_attendance("2024-01-01".into()).await.unwrap();
  let names: Vec<_> = day.iter().map(|r| r.subject_name.as_str()).collect();
  assert_eq!(names, ["Alice", "Bob"]);
  assert!(day.iter().all(|r| r.date == "2024-01-01"));

  assert!(s.list_attendance("1999-12-31".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_attendance_counts_and_empties() {
  let s = store().await;
  s.create_attendance(alice()).await.unwrap();
  s.create_attendance(NewAttendance::new("Bob", "2024-01-01"))
    .await
    .unwrap();

  assert_eq!(s.clear_attendance().await.unwrap(), 2);
  assert_eq!(s.clear_attendance().await.unwrap(), 0);

  // The key is free again once cleared.
  s.create_attendance(alice()).await.unwrap();
}

// ─── Index provisioning ──────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_is_idempotent_and_rebuild_keeps_data() {
  let s = store().await;
  s.create_attendance(alice()).await.unwrap();

  s.provision_indexes(IndexMode::Ensure).await.unwrap();
  s.provision_indexes(IndexMode::Rebuild).await.unwrap();

  assert_eq!(s.list_attendance("2024-01-01".into()).await.unwrap().len(), 1);
  let err = s.create_attendance(alice()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn provisioning_fails_over_existing_duplicates() {
  let s = SqliteStore::open_in_memory().await.unwrap();

  // Without the index nothing stops a duplicate.
  s.create_attendance(alice()).await.unwrap();
  s.create_attendance(alice()).await.unwrap();

  assert!(s.provision_indexes(IndexMode::Ensure).await.is_err());
}

// ─── Announcements ───────────────────────────────────────────────────────────

#[tokio::test]
async fn announcements_list_newest_first() {
  let s = store().await;
  s.create_announcement(NewAnnouncement::new("first", "staff"))
    .await
    .unwrap();
  s.create_announcement(NewAnnouncement::new("second", "staff"))
    .await
    .unwrap();
  s.create_announcement(NewAnnouncement::new("third", "dean"))
    .await
    .unwrap();

  let all = s.list_announcements().await.unwrap();
  let contents: Vec<_> = all.iter().map(|a| a.content.as_str()).collect();
  assert_eq!(contents, ["third", "second", "first"]);
  assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn clear_announcements_counts() {
  let s = store().await;
  assert_eq!(s.clear_announcements().await.unwrap(), 0);
  s.create_announcement(NewAnnouncement::new("quiz friday", "staff"))
    .await
    .unwrap();
  assert_eq!(s.clear_announcements().await.unwrap(), 1);
  assert!(s.list_announcements().await.unwrap().is_empty());
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_message_removes_only_that_one() {
  let s = store().await;
  let keep = s.create_message(NewMessage::new("keep me")).await.unwrap();
  let gone = s.create_message(NewMessage::new("drop me")).await.unwrap();
  assert_ne!(keep.id, gone.id);

  s.delete_message(gone.id.clone()).await.unwrap();

  let left = s.list_messages().await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].id, keep.id);

  let err = s.delete_message(gone.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn unknown_message_id_is_not_found() {
  let s = store().await;
  let err = s
    .delete_message(MessageId::from("not-an-id".to_owned()))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn messages_round_trip_with_defaults() {
  let s = store().await;
  let mut input = NewMessage::new("the projector is broken");
  input.contact_info = "room 12".into();
  let created = s.create_message(input).await.unwrap();

  let listed = s.list_messages().await.unwrap();
  assert_eq!(listed, vec![created.clone()]);
  assert_eq!(created.sender, "Anonymous");
  assert_eq!(created.contact_info, "room 12");
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn ping_fails_after_close() {
  let s = store().await;
  s.ping().await.unwrap();

  let other = s.clone();
  s.close().await.unwrap();

  let err = other.ping().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn connect_opens_a_file_store() {
  let dir = std::env::temp_dir().join(format!("rollcall-{}", uuid::Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("roll.db");

  let s = SqliteStore::connect(&path, std::time::Duration::from_secs(5))
    .await
    .unwrap();
  s.provision_indexes(IndexMode::Ensure).await.unwrap();
  s.create_attendance(alice()).await.unwrap();
  s.close().await.unwrap();

  let reopened = SqliteStore::open(&path).await.unwrap();
  reopened.provision_indexes(IndexMode::Ensure).await.unwrap();
  assert_eq!(reopened.list_attendance("2024-01-01".into()).await.unwrap().len(), 1);
  assert_eq!(
    reopened.create_attendance(alice()).await.unwrap_err().kind(),
    ErrorKind::Conflict
  );

  drop(reopened);
  std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn unexpected_unique_violation_is_not_reported_as_created() {
  let s = store().await;
  s.execute_batch(
    "CREATE UNIQUE INDEX announcements_content_uidx
       ON announcements (json_extract(doc, '$.content'));",
  )
  .await
  .unwrap();

  s.create_announcement(NewAnnouncement::new("exam moved", "staff"))
    .await
    .unwrap();
  let err = s
    .create_announcement(NewAnnouncement::new("exam moved", "dean"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnexpectedConflict("announcements")));
  assert_eq!(err.kind(), ErrorKind::Internal);
  assert_eq!(s.list_announcements().await.unwrap().len(), 1);
}
