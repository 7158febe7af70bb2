use crate::session::{ConnectionState, DisconnectReason, SessionState};
use crate::transport::TransportSignal;

#[test]
fn open_moves_connecting_to_connected() {
    let state = SessionState::Connecting.on_signal(&TransportSignal::Opened);

    assert_eq!(state, SessionState::Connected);
    assert_eq!(state.connection_state(), ConnectionState::Connected);
}

#[test]
fn error_and_close_disconnect() {
    let errored = SessionState::Connected.on_signal(&TransportSignal::Error("reset".into()));
    let closed = SessionState::Connecting.on_signal(&TransportSignal::Closed);

    assert_eq!(errored, SessionState::Disconnected(DisconnectReason::Error));
    assert_eq!(closed, SessionState::Disconnected(DisconnectReason::Closed));
    assert_eq!(errored.connection_state(), ConnectionState::Disconnected);
    assert!(errored.accepts_events());
}

#[test]
fn disconnected_reflects_a_later_open() {
    let state = SessionState::Disconnected(DisconnectReason::Error).on_signal(&TransportSignal::Opened);

    assert_eq!(state, SessionState::Connected);
}

#[test]
fn unauthorized_is_terminal() {
    let state = SessionState::Connected.on_signal(&TransportSignal::Unauthorized);

    assert!(state.is_terminal());
    assert!(!state.accepts_events());
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
    assert_eq!(state.on_signal(&TransportSignal::Opened), state);
    assert_eq!(state.on_signal(&TransportSignal::Closed), state);
}

#[test]
fn idle_ignores_signals() {
    let state = SessionState::Idle.on_signal(&TransportSignal::Opened);

    assert_eq!(state, SessionState::Idle);
    assert!(!state.accepts_events());
    assert_eq!(state.connection_state(), ConnectionState::Disconnected);
}

#[test]
fn connection_state_labels() {
    assert_eq!(ConnectionState::Connecting.to_string(), "Connecting...");
    assert_eq!(ConnectionState::Connected.to_string(), "Connected");
    assert_eq!(ConnectionState::Disconnected.to_string(), "Disconnected");
}
