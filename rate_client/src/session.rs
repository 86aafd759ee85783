//! Session state: the current link, the connection id counter and the view.
//!
//! A `Session` is owned by the event loop and mutated only from there, one event at a
//! time, so handlers always run to completion in arrival order.
use crossbeam_channel::Sender;
use log::{debug, error, info};
use url::Url;

use crate::connection::{ConnectionEvent, ConnectionId, ConnectionState, Connector, Link, LinkEvent};
use crate::handler;
use crate::view::View;

/// Client session bound to one server endpoint.
pub struct Session<C: Connector> {
    connector: C,
    endpoint: Url,
    events: Sender<ConnectionEvent>,
    link: Option<C::Link>,
    /// Id of the most recent connection attempt; events of older ones are stale.
    current_id: ConnectionId,
    view: View,
}

impl<C: Connector> Session<C> {
    /// Create a session for `endpoint`. Nothing is opened until `connect()`.
    pub fn new(connector: C, endpoint: Url, events: Sender<ConnectionEvent>) -> Self {
        Self {
            connector,
            endpoint,
            events,
            link: None,
            current_id: 0,
            view: View::default(),
        }
    }

    /// Open a connection unless one is already open.
    ///
    /// A link that is still connecting or has closed is released and replaced. Its
    /// pending `Close` event becomes stale, so the view is reset here instead.
    pub fn connect(&mut self) {
        if self.state() == ConnectionState::Open {
            info!("Already connected");
            return;
        }
        if let Some(mut previous) = self.link.take() {
            previous.close();
            self.view.on_close();
        }

        self.current_id += 1;
        info!(
            "Connecting to {} (connection #{})",
            self.endpoint, self.current_id
        );
        let link = self
            .connector
            .open(self.current_id, &self.endpoint, self.events.clone());
        self.link = Some(link);
    }

    /// Close and release the current link, if any.
    ///
    /// The view is reset once the link reports its `Close` event.
    pub fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            info!("Disconnecting connection #{}", self.current_id);
            link.close();
        }
    }

    /// Liveness check: reconnect when the current link has closed.
    ///
    /// Returns `true` if a new connection attempt was started. After `disconnect()`
    /// there is no link, so nothing is re-opened.
    pub fn on_tick(&mut self) -> bool {
        if self.state() == ConnectionState::Closed {
            info!("Attempting to reconnect...");
            self.connect();
            true
        } else {
            false
        }
    }

    /// Apply a link event. Returns `true` when the view changed.
    pub fn handle_event(&mut self, event: ConnectionEvent) -> bool {
        if event.id != self.current_id {
            debug!("Ignoring {:?} from stale connection #{}", event.kind, event.id);
            return false;
        }

        match event.kind {
            LinkEvent::Open => {
                self.view.on_open();
                true
            }
            LinkEvent::Close => {
                self.view.on_close();
                true
            }
            LinkEvent::Error(reason) => {
                error!("WebSocket error: {}", reason);
                self.view.on_error();
                true
            }
            LinkEvent::Message(text) => handler::handle_message(&mut self.view, &text),
        }
    }

    /// State of the current link, `Disconnected` when there is none.
    pub fn state(&self) -> ConnectionState {
        self.link
            .as_ref()
            .map_or(ConnectionState::Disconnected, Link::state)
    }

    /// Current display state.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Server endpoint every connection is opened to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
