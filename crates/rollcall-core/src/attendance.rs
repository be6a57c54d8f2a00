//! Attendance records and the composite key that identifies them.
//!
//! A record is identified by `(subject_name, date)`. The pair is unique across
//! the whole collection; the store enforces this with a unique index rather
//! than an application-level lookup. `date` is an opaque label and is only
//! checked for presence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, require};

/// The composite identity of an attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttendanceKey {
  pub subject_name: String,
  pub date:         String,
}

impl AttendanceKey {
  pub fn new(subject_name: impl Into<String>, date: impl Into<String>) -> Self {
    Self { subject_name: subject_name.into(), date: date.into() }
  }
}

/// A persisted attendance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  #[serde(alias = "name")]
  pub subject_name: String,
  pub date:         String,
  #[serde(default)]
  pub is_present:   bool,
  /// Set once by the store at creation; never updated.
  #[serde(alias = "timestamp")]
  pub created_at:   DateTime<Utc>,
}

impl AttendanceRecord {
  pub fn key(&self) -> AttendanceKey {
    AttendanceKey::new(self.subject_name.clone(), self.date.clone())
  }
}

/// Input for creating a record. `created_at` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendance {
  #[serde(alias = "name")]
  pub subject_name: String,
  pub date:         String,
  #[serde(default)]
  pub is_present:   bool,
}

impl NewAttendance {
  /// An absent-by-default record for `subject_name` on `date`.
  pub fn new(subject_name: impl Into<String>, date: impl Into<String>) -> Self {
    Self {
      subject_name: subject_name.into(),
      date:         date.into(),
      is_present:   false,
    }
  }

  pub fn validate(&self) -> Result<()> {
    require("subject_name", &self.subject_name)?;
    require("date", &self.date)
  }

  pub fn into_record(self, created_at: DateTime<Utc>) -> AttendanceRecord {
    AttendanceRecord {
      subject_name: self.subject_name,
      date: self.date,
      is_present: self.is_present,
      created_at,
    }
  }
}
