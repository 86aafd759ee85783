//!
//! Common types and utilities shared by the rate display client.
//!
//! This crate aggregates:
//! - `error` — unified error type `RateError` used across the workspace.
//! - `result` — handy `Result<T, RateError>` alias.
//! - `currency` — currency catalogue: display priority and names.
//! - `message` — JSON messages pushed by the rate server.
//! - `net` — endpoint constants and small helpers.
#![warn(missing_docs)]
pub mod currency;
pub mod error;
pub mod message;
pub mod net;
pub mod result;

pub use error::RateError;
pub use message::{RateSnapshot, ServerMessage};
pub use result::Result;
