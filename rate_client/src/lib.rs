//! Live currency-rate display client.
//!
//! Connects to a rate server over WebSocket, shows the latest rate snapshot as a table
//! ordered by currency priority, and re-opens the connection on a fixed interval when
//! it drops. Modules:
//! - `connection` — links, connectors and the WebSocket reader thread.
//! - `session` — session state: current link, connect/disconnect, liveness check.
//! - `handler` — applies server messages to the view.
//! - `renderer` — the rate table.
//! - `status` — connection indicator and controls.
//! - `view` — the complete display state.
//! - `commands` — stdin commands.
//! - `event_loop` — multiplexes all inputs.
pub mod args;
pub mod commands;
pub mod connection;
pub mod event_loop;
pub mod handler;
pub mod renderer;
pub mod session;
pub mod status;
pub mod view;
