//! WebSocket link to the rate server.
//!
//! A link is opened through a [`Connector`] and reports everything that happens to it
//! as [`ConnectionEvent`]s on a crossbeam channel: `Open`, each text `Message`, transport
//! `Error`s and finally `Close`. The session polls [`Link::state`] from its liveness
//! timer to decide whether a new connection is needed.
//!
//! [`WsConnector`] runs each socket on its own reader thread. The socket gets a short
//! read timeout so the thread notices a requested shutdown between reads.
use log::{debug, error, info, warn};
use std::io::{self, ErrorKind};
use std::net::TcpStream;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use rate_common::RateError;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};
use url::Url;

/// Read timeout used by the reader thread between shutdown checks.
const READ_TIMEOUT_MS: u64 = 250;

/// Identifier of one connection attempt. Every `connect()` issues a new one.
pub type ConnectionId = u64;

/// Lifecycle of a single link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No link exists.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Handshake completed, messages are flowing.
    Open,
    /// The link ended, either on request or unexpectedly.
    Closed,
}

/// What happened on a link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The handshake completed.
    Open,
    /// A text frame arrived.
    Message(String),
    /// Transport failure. Always followed by `Close`.
    Error(String),
    /// The link is gone.
    Close,
}

/// A [`LinkEvent`] tagged with the connection it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    /// Connection that produced the event.
    pub id: ConnectionId,
    /// The event itself.
    pub kind: LinkEvent,
}

/// Handle to an opened link.
pub trait Link {
    /// Current state of the link.
    fn state(&self) -> ConnectionState;
    /// Request the link to close. A `Close` event follows once it has.
    fn close(&mut self);
}

/// Opens links to the server.
pub trait Connector {
    /// Link type produced by this connector.
    type Link: Link;

    /// Start connecting to `url`. Returns immediately with a link in the
    /// `Connecting` state; the outcome is reported on `events`.
    fn open(&self, id: ConnectionId, url: &Url, events: Sender<ConnectionEvent>) -> Self::Link;
}

/// Connector producing real WebSocket links.
#[derive(Debug, Clone)]
pub struct WsConnector {
    read_timeout: Duration,
}

impl WsConnector {
    /// Create a connector with the default read timeout.
    pub fn new() -> Self {
        Self {
            read_timeout: Duration::from_millis(READ_TIMEOUT_MS),
        }
    }

    /// Override how long the reader blocks before re-checking for shutdown.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for WsConnector {
    type Link = WsLink;

    fn open(&self, id: ConnectionId, url: &Url, events: Sender<ConnectionEvent>) -> WsLink {
        let state = Arc::new(Mutex::new(ConnectionState::Connecting));
        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = LinkReader {
            id,
            url: url.clone(),
            read_timeout: self.read_timeout,
            state: Arc::clone(&state),
            shutdown: Arc::clone(&shutdown),
            events,
        };

        let spawned = thread::Builder::new()
            .name(format!("ws-link-{id}"))
            .spawn(move || reader.run());
        if let Err(e) = spawned {
            error!("Failed to spawn reader for connection #{}: {}", id, e);
            // No events will follow; the liveness check picks the closed state up.
            set_state(&state, ConnectionState::Closed);
        }

        WsLink { state, shutdown }
    }
}

/// A WebSocket link driven by a background reader thread.
pub struct WsLink {
    state: Arc<Mutex<ConnectionState>>,
    shutdown: Arc<AtomicBool>,
}

impl Link for WsLink {
    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Drop for WsLink {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn set_state(state: &Mutex<ConnectionState>, next: ConnectionState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
}

fn set_read_timeout(
    socket: &WebSocket<MaybeTlsStream<TcpStream>>,
    timeout: Duration,
) -> io::Result<()> {
    match socket.get_ref() {
        MaybeTlsStream::Plain(stream) => stream.set_read_timeout(Some(timeout)),
        MaybeTlsStream::NativeTls(stream) => stream.get_ref().set_read_timeout(Some(timeout)),
        _ => Ok(()),
    }
}

/// State owned by the reader thread of one link.
struct LinkReader {
    id: ConnectionId,
    url: Url,
    read_timeout: Duration,
    state: Arc<Mutex<ConnectionState>>,
    shutdown: Arc<AtomicBool>,
    events: Sender<ConnectionEvent>,
}

impl LinkReader {
    fn run(self) {
        let mut socket = match tungstenite::connect(self.url.as_str()) {
            Ok((socket, _response)) => socket,
            Err(e) => {
                self.finish(Some(e.into()));
                return;
            }
        };

        if self.shutdown.load(Ordering::SeqCst) {
            // Closed while the handshake was still running.
            let _ = socket.close(None);
            let _ = socket.flush();
            self.finish(None);
            return;
        }

        if let Err(e) = set_read_timeout(&socket, self.read_timeout) {
            warn!("Connection #{}: cannot set read timeout: {}", self.id, e);
        }

        set_state(&self.state, ConnectionState::Open);
        info!("WebSocket connection #{} established to {}", self.id, self.url);
        self.emit(LinkEvent::Open);

        let outcome = self.receive_loop(&mut socket);
        self.finish(outcome.err());
    }

    /// Reads frames until the link ends or a shutdown is requested.
    fn receive_loop(
        &self,
        socket: &mut WebSocket<MaybeTlsStream<TcpStream>>,
    ) -> Result<(), RateError> {
        while !self.shutdown.load(Ordering::Relaxed) {
            match socket.read() {
                Ok(Message::Text(text)) => {
                    debug!("Connection #{} received: {}", self.id, text);
                    self.emit(LinkEvent::Message(text));
                }
                Ok(Message::Close(frame)) => {
                    debug!("Connection #{} close frame: {:?}", self.id, frame);
                }
                Ok(_) => {}
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Connection #{} closing on request", self.id);
        // The peer may already be gone; the link is closed either way.
        let _ = socket.close(None);
        let _ = socket.flush();
        Ok(())
    }

    fn finish(&self, failure: Option<RateError>) {
        set_state(&self.state, ConnectionState::Closed);
        if let Some(e) = failure {
            self.emit(LinkEvent::Error(e.to_string()));
        }
        info!("WebSocket connection #{} closed", self.id);
        self.emit(LinkEvent::Close);
    }

    fn emit(&self, kind: LinkEvent) {
        let event = ConnectionEvent { id: self.id, kind };
        if let Err(e) = self.events.send(event) {
            debug!("Connection #{}: event dropped, session gone: {}", self.id, e);
        }
    }
}
