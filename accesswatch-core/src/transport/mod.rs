//! Event transports.
//!
//! A transport owns the long-lived connection to an event source. It reports
//! back through a [`SignalSink`]: access events are pushed straight into the
//! session's intake buffer, lifecycle changes travel to the session driver as
//! [`TransportSignal`]s. Reconnection and framing stay inside the transport.

mod error;
mod lines;
mod sink;
mod sse;


pub use error::TransportError;
pub use lines::JsonLinesTransport;
pub use sink::SignalSink;
pub use sse::{ACCESS_EVENT_NAME, MAX_LINE_BYTES, SseDecoder, SseEvent, SseTransport};

use crate::session::Credential;
use async_trait::async_trait;

/// Lifecycle signals a transport emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportSignal {
    /// Stream accepted by the source.
    Opened,
    /// Credential rejected. Terminal for the session.
    Unauthorized,
    /// Transient failure.
    Error(String),
    /// Source ended the stream.
    Closed,
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Run one subscription until it ends.
    ///
    /// Implementations call [`SignalSink::opened`] once the source accepts the
    /// stream and push events as they arrive. Returning `Ok` is reported as
    /// [`TransportSignal::Closed`], returning an error as `Unauthorized` or
    /// `Error` depending on its kind.
    async fn run(&self, credential: Credential, sink: SignalSink) -> Result<(), TransportError>;
}
