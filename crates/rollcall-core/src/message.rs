//! Anonymous student messages.
//!
//! Each message carries a store-assigned identifier that clients treat as an
//! opaque string; it is the only handle for deleting a single message.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, require};

/// Sender recorded when the client leaves it out or blank.
pub const ANONYMOUS: &str = "Anonymous";

/// Opaque, store-assigned message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for MessageId {
  fn from(s: String) -> Self { Self(s) }
}

impl fmt::Display for MessageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMessage {
  pub id:           MessageId,
  pub content:      String,
  pub sender:       String,
  pub contact_info: String,
  #[serde(alias = "timestamp")]
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
  pub content:      String,
  #[serde(default = "anonymous")]
  pub sender:       String,
  #[serde(default)]
  pub contact_info: String,
}

fn anonymous() -> String { ANONYMOUS.to_owned() }

impl NewMessage {
  pub fn new(content: impl Into<String>) -> Self {
    Self {
      content:      content.into(),
      sender:       anonymous(),
      contact_info: String::new(),
    }
  }

  pub fn validate(&self) -> Result<()> { require("content", &self.content) }

  pub fn into_message(self, id: MessageId, created_at: DateTime<Utc>) -> StudentMessage {
    let sender = if self.sender.trim().is_empty() {
      anonymous()
    } else {
      self.sender
    };
    StudentMessage {
      id,
      content: self.content,
      sender,
      contact_info: self.contact_info,
      created_at,
    }
  }
}
