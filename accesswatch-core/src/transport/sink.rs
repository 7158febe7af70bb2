use crate::event::{AccessEvent, parse_access_event};
use crate::stream::IntakeBuffer;
use crate::transport::TransportSignal;
use tokio::sync::mpsc;

/// The transport's only handle into a session.
///
/// Every method returns immediately. Once the session stops accepting events
/// (unauthorized or torn down) pushes are refused and [`SignalSink::is_closed`]
/// turns true so the transport can stop reading.
#[derive(Debug, Clone)]
pub struct SignalSink {
    intake: IntakeBuffer,
    signals: mpsc::UnboundedSender<TransportSignal>,
}

impl SignalSink {
    pub fn new(intake: IntakeBuffer, signals: mpsc::UnboundedSender<TransportSignal>) -> Self {
        Self { intake, signals }
    }

    pub fn push(&self, event: AccessEvent) -> bool {
        self.intake.push(event)
    }

    /// Decode and push one JSON record; malformed records are dropped.
    pub fn push_raw(&self, data: &str) -> bool {
        match parse_access_event(data) {
            Some(event) => self.push(event),
            None => false,
        }
    }

    pub fn opened(&self) {
        self.signal(TransportSignal::Opened);
    }

    pub fn unauthorized(&self) {
        self.signal(TransportSignal::Unauthorized);
    }

    pub fn error(&self, reason: impl Into<String>) {
        self.signal(TransportSignal::Error(reason.into()));
    }

    pub fn closed(&self) {
        self.signal(TransportSignal::Closed);
    }

    pub fn is_closed(&self) -> bool {
        self.intake.is_closed() || self.signals.is_closed()
    }

    fn signal(&self, signal: TransportSignal) {
        // The session is gone; nothing left to tell.
        let _ = self.signals.send(signal);
    }
}
