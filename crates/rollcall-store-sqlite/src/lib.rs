//! SQLite document store for Rollcall.
//!
//! Each collection is a table of JSON documents. Access goes through
//! [`tokio_rusqlite`] so queries run on a dedicated thread without blocking
//! the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::IndexMode;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
