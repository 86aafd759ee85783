//! Rate Client — a WebSocket client that subscribes to live currency rates and prints
//! them as a table. It connects to `<host>/ws`, shows the observer id assigned by the
//! server and the latest rate snapshot, and re-opens the connection every
//! `RECONNECT_INTERVAL` while it is closed.
//!
//! Usage example (CLI):
//! ```bash
//! rate_client --host rates.example.com --secure
//! ```
//!
//! While running, type `connect`, `disconnect` or `quit` followed by Enter.
#![warn(missing_docs)]
use clap::Parser;
use crossbeam_channel::{bounded, unbounded};
use log::info;
use rate_client::args::Args;
use rate_client::commands;
use rate_client::connection::WsConnector;
use rate_client::event_loop::{self, Inputs};
use rate_client::session::Session;
use rate_common::net::{self, RECONNECT_INTERVAL};
use rate_common::{RateError, Result};
use std::io::{self, BufReader};

fn main() -> Result<(), RateError> {
    init_logger();
    let args = Args::parse();
    let endpoint = net::endpoint(&args.host, &args.path, args.secure)?;

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| RateError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let (event_tx, event_rx) = unbounded();
    let mut session = Session::new(WsConnector::new(), endpoint, event_tx);
    info!("Rate client for {}", session.endpoint());
    if !args.no_autoconnect {
        session.connect();
    }

    let inputs = Inputs {
        events: event_rx,
        commands: commands::spawn_reader(BufReader::new(io::stdin())),
        shutdown: shutdown_rx,
        interval: RECONNECT_INTERVAL,
    };
    info!("Client is running. Type 'quit' or press Ctrl+C to exit.");
    event_loop::run(&mut session, inputs, &mut io::stdout())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
