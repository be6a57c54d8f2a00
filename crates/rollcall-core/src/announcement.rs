//! Announcements: append-only notices, listed newest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, require};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
  pub content:    String,
  pub author:     String,
  #[serde(alias = "timestamp")]
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnnouncement {
  pub content: String,
  pub author:  String,
}

impl NewAnnouncement {
  pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
    Self { content: content.into(), author: author.into() }
  }

  pub fn validate(&self) -> Result<()> {
    require("content", &self.content)?;
    require("author", &self.author)
  }

  pub fn into_announcement(self, created_at: DateTime<Utc>) -> Announcement {
    Announcement { content: self.content, author: self.author, created_at }
  }
}
