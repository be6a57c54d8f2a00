//! Encoding helpers between domain types and the text stored in SQLite.
//!
//! Documents are compact JSON. The `created_at` ordering column is RFC 3339
//! with a fixed microsecond precision and a `Z` suffix, so string order is
//! chronological order.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::Result;

/// A fresh document id.
pub fn new_id() -> String { Uuid::new_v4().hyphenated().to_string() }

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn encode_doc<T: Serialize>(doc: &T) -> Result<String> {
  Ok(serde_json::to_string(doc)?)
}

pub fn decode_doc<T: DeserializeOwned>(raw: &str) -> Result<T> {
  Ok(serde_json::from_str(raw)?)
}

pub fn decode_docs<T: DeserializeOwned>(raws: Vec<String>) -> Result<Vec<T>> {
  raws.iter().map(|raw| decode_doc(raw)).collect()
}
