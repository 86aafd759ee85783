//! The client's single event loop.
//!
//! Link events, user commands, the liveness timer and the shutdown signal are
//! multiplexed with crossbeam `select!`. Each input is handled to completion before the
//! next is taken, and the view is redrawn whenever it changed.
use std::io::Write;
use std::time::Duration;

use crossbeam_channel::{never, select, tick, Receiver};
use log::{debug, info};
use rate_common::{RateError, Result};

use crate::commands::UserCommand;
use crate::connection::{ConnectionEvent, Connector};
use crate::session::Session;
use crate::view::View;

/// Channels feeding the event loop.
pub struct Inputs {
    pub events: Receiver<ConnectionEvent>,
    pub commands: Receiver<UserCommand>,
    pub shutdown: Receiver<()>,
    /// Liveness check period.
    pub interval: Duration,
}

enum Input {
    Event(ConnectionEvent),
    Command(UserCommand),
    CommandsClosed,
    Tick,
    Shutdown,
}

/// Write the view to `out`.
pub fn draw<W: Write>(out: &mut W, view: &View) -> Result<()> {
    writeln!(out, "{view}")?;
    out.flush()?;
    Ok(())
}

/// Run until a quit command or the shutdown signal arrives.
pub fn run<C: Connector, W: Write>(
    session: &mut Session<C>,
    inputs: Inputs,
    out: &mut W,
) -> Result<()> {
    let Inputs {
        events,
        mut commands,
        shutdown,
        interval,
    } = inputs;
    let ticker = tick(interval);

    draw(out, session.view())?;
    loop {
        let input = select! {
            recv(events) -> event => match event {
                Ok(event) => Input::Event(event),
                Err(e) => return Err(RateError::ChannelRecv(e.to_string())),
            },
            recv(commands) -> command => match command {
                Ok(command) => Input::Command(command),
                Err(_) => Input::CommandsClosed,
            },
            recv(ticker) -> _ => Input::Tick,
            recv(shutdown) -> _ => Input::Shutdown,
        };

        if let Input::Command(command) = &input {
            debug!("User command: {}", command);
        }
        let changed = match input {
            Input::Event(event) => session.handle_event(event),
            Input::Command(UserCommand::Connect) => {
                session.connect();
                true
            }
            Input::Command(UserCommand::Disconnect) => {
                session.disconnect();
                false
            }
            Input::Command(UserCommand::Quit) | Input::Shutdown => break,
            Input::CommandsClosed => {
                debug!("No more user commands, running until shutdown");
                commands = never();
                false
            }
            Input::Tick => session.on_tick(),
        };

        if changed {
            draw(out, session.view())?;
        }
    }

    session.disconnect();
    info!("Client stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionState, LinkEvent};
    use crate::session::tests::{harness, Harness};
    use crossbeam_channel::{bounded, unbounded, Sender};
    use rstest::rstest;

    fn inputs(events: Receiver<ConnectionEvent>) -> (Inputs, Sender<UserCommand>, Sender<()>) {
        let (command_tx, command_rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let inputs = Inputs {
            events,
            commands: command_rx,
            shutdown: shutdown_rx,
            interval: Duration::from_secs(3600),
        };
        (inputs, command_tx, shutdown_tx)
    }

    #[rstest]
    fn test_commands_drive_session_until_quit(mut harness: Harness) {
        let (events_tx, events_rx) = unbounded();
        let (inputs, command_tx, _shutdown_tx) = inputs(events_rx);

        let driver_events = events_tx.clone();
        command_tx.send(UserCommand::Connect).unwrap();
        // `select!` picks among ready channels at random, so space the inputs out.
        let driver = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            driver_events
                .send(ConnectionEvent { id: 1, kind: LinkEvent::Open })
                .unwrap();
            std::thread::sleep(Duration::from_millis(50));
            command_tx.send(UserCommand::Quit).unwrap();
        });

        let mut out = Vec::new();
        run(&mut harness.session, inputs, &mut out).unwrap();
        driver.join().unwrap();
        drop(events_tx);

        assert_eq!(harness.connector.count(), 1);
        assert_eq!(harness.session.state(), ConnectionState::Disconnected);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Статус: Отключен"));
        assert!(text.contains("Статус: Подключен (status connected)"));
    }

    #[rstest]
    fn test_shutdown_stops_loop_and_disconnects(mut harness: Harness) {
        let (_events_tx, events_rx) = unbounded();
        let (inputs, command_tx, shutdown_tx) = inputs(events_rx);
        drop(command_tx);
        harness.session.connect();
        shutdown_tx.send(()).unwrap();

        let mut out = Vec::new();
        run(&mut harness.session, inputs, &mut out).unwrap();

        assert_eq!(harness.session.state(), ConnectionState::Disconnected);
    }

    #[rstest]
    fn test_tick_reconnects_closed_link(mut harness: Harness) {
        let (_events_tx, events_rx) = unbounded();
        let (mut inputs, command_tx, shutdown_tx) = inputs(events_rx);
        inputs.interval = Duration::from_millis(20);
        harness.session.connect();
        harness.connector.set_state(1, ConnectionState::Closed);

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(70));
            shutdown_tx.send(()).unwrap();
            drop(command_tx);
        });
        let mut out = Vec::new();
        run(&mut harness.session, inputs, &mut out).unwrap();
        stopper.join().unwrap();

        // One reconnect; the new attempt stays connecting so later ticks do nothing.
        assert_eq!(harness.connector.count(), 2);
    }
}
