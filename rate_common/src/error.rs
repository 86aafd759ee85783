//! Error types shared by the rate client crates.
//!
//! The `RateError` enum unifies common failure cases for I/O, WebSocket transport,
//! JSON decoding, and channel communication, allowing crates to propagate a
//! single error type.
use std::io;

use thiserror::Error;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum RateError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// WebSocket handshake or transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] Box<tungstenite::Error>),

    /// The configured server endpoint is not a valid URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}

impl From<tungstenite::Error> for RateError {
    fn from(err: tungstenite::Error) -> Self {
        RateError::WebSocket(Box::new(err))
    }
}
