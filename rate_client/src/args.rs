//! Command-line arguments for the rate client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use rate_common::net::{DEFAULT_HOST, WS_PATH};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Rate server host, optionally with a port (e.g. `localhost:8888`).
    #[clap(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Connect over TLS (`wss://`) instead of plain `ws://`.
    #[clap(long)]
    pub secure: bool,

    /// Path of the WebSocket endpoint on the server.
    #[clap(long, default_value = WS_PATH)]
    pub path: String,

    /// Do not connect at startup; wait for a `connect` command.
    #[clap(long)]
    pub no_autoconnect: bool,
}
