use crate::transport::TransportSignal;
use serde::Serialize;
use std::fmt;

/// What the rendering layer shows: the latest transport lifecycle signal only.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => f.write_str("Connecting..."),
            ConnectionState::Connected => f.write_str("Connected"),
            ConnectionState::Disconnected => f.write_str("Disconnected"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DisconnectReason {
    Closed,
    Error,
    Unauthorized,
}

/// Session lifecycle.
///
/// Idle -> Connecting on credential, Connecting/Connected -> Disconnected on
/// error/close, Disconnected -> Connected when the transport reopens, any ->
/// Idle when the credential goes away. `Disconnected(Unauthorized)` is
/// terminal until a new credential starts a new session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    Disconnected(DisconnectReason),
}

impl SessionState {
    pub fn connection_state(&self) -> ConnectionState {
        match self {
            SessionState::Connecting => ConnectionState::Connecting,
            SessionState::Connected => ConnectionState::Connected,
            SessionState::Idle | SessionState::Disconnected(_) => ConnectionState::Disconnected,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Disconnected(DisconnectReason::Unauthorized)
        )
    }

    /// Whether transport events may still be aggregated.
    pub fn accepts_events(&self) -> bool {
        !matches!(self, SessionState::Idle) && !self.is_terminal()
    }

    /// State after `signal`. Idle and terminal states ignore every signal.
    pub fn on_signal(self, signal: &TransportSignal) -> SessionState {
        if matches!(self, SessionState::Idle) || self.is_terminal() {
            return self;
        }

        match signal {
            TransportSignal::Opened => SessionState::Connected,
            TransportSignal::Unauthorized => {
                SessionState::Disconnected(DisconnectReason::Unauthorized)
            }
            TransportSignal::Error(_) => SessionState::Disconnected(DisconnectReason::Error),
            TransportSignal::Closed => SessionState::Disconnected(DisconnectReason::Closed),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Connecting => f.write_str("connecting"),
            SessionState::Connected => f.write_str("connected"),
            SessionState::Disconnected(DisconnectReason::Closed) => f.write_str("disconnected (closed)"),
            SessionState::Disconnected(DisconnectReason::Error) => f.write_str("disconnected (error)"),
            SessionState::Disconnected(DisconnectReason::Unauthorized) => {
                f.write_str("disconnected (unauthorized)")
            }
        }
    }
}
