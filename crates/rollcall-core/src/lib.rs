//! Core types and trait definitions for the Rollcall attendance service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it.

pub mod announcement;
pub mod attendance;
pub mod error;
pub mod message;
pub mod store;

pub use error::{Error, ErrorKind, Result, StoreError};
