//! Connection status indicator and the connect/disconnect controls.
use strum_macros::Display;

/// The two states of the status indicator. `Display` yields the label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConnectionStatus {
    #[strum(serialize = "Подключен")]
    Connected,
    #[strum(serialize = "Отключен")]
    Disconnected,
}

impl ConnectionStatus {
    /// Style class applied to the indicator in this state.
    pub fn style_class(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "status connected",
            ConnectionStatus::Disconnected => "status disconnected",
        }
    }
}

/// Indicator updated on every open, close and error of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    status: ConnectionStatus,
}

impl StatusIndicator {
    pub fn set_connected(&mut self, connected: bool) {
        self.status = if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
        }
    }
}

/// Enabled flags of the two user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub connect_enabled: bool,
    pub disconnect_enabled: bool,
}

impl Controls {
    /// Mirror the connection state: while connected only "disconnect" is usable.
    pub fn set_connected(&mut self, connected: bool) {
        self.connect_enabled = !connected;
        self.disconnect_enabled = connected;
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            connect_enabled: true,
            disconnect_enabled: false,
        }
    }
}
