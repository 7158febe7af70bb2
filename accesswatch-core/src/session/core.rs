use crate::conf::StreamSettings;
use crate::filter::StreamFilter;
use crate::session::state::SessionState;
use crate::stream::{IntakeBuffer, StreamViews, TickReport, WindowAggregator};
use crate::transport::TransportSignal;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Synchronous heart of one session: lifecycle state, current filter, intake
/// buffer and aggregates.
///
/// Owned by exactly one driver; every mutation goes through `&mut self`.
#[derive(Debug)]
pub struct SessionCore {
    state: SessionState,
    filter: StreamFilter,
    intake: IntakeBuffer,
    aggregator: WindowAggregator,
}

impl SessionCore {
    /// A session whose credential is present and whose transport is opening.
    pub fn new(filter: StreamFilter, settings: &StreamSettings) -> Self {
        Self {
            state: SessionState::Connecting,
            filter,
            intake: IntakeBuffer::new(),
            aggregator: WindowAggregator::from_settings(settings),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn filter(&self) -> &StreamFilter {
        &self.filter
    }

    pub fn intake(&self) -> &IntakeBuffer {
        &self.intake
    }

    pub fn epoch(&self) -> u64 {
        self.aggregator.epoch()
    }

    /// Apply a transport lifecycle signal. Returns `true` if the state changed.
    ///
    /// Entering the terminal unauthorized state closes the intake: events
    /// already buffered are discarded and later pushes are refused.
    pub fn on_signal(&mut self, signal: &TransportSignal) -> bool {
        let next = self.state.on_signal(signal);
        if next == self.state {
            return false;
        }

        if next.is_terminal() {
            let discarded = self.intake.close();
            warn!(discarded, "credential rejected, no further events accepted");
        }
        self.state = next;
        true
    }

    /// Replace the filter. A different value starts a new epoch: every
    /// aggregate is zeroed before this returns. Buffered events stay and are
    /// judged by the new filter on the next tick.
    pub fn set_filter(&mut self, filter: StreamFilter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.aggregator.reset();
        true
    }

    pub fn tick(&mut self, closed_at: DateTime<Utc>) -> TickReport {
        self.aggregator.tick(&self.intake, &self.filter, closed_at)
    }

    pub fn snapshot(&self) -> StreamViews {
        self.aggregator.snapshot()
    }

    /// Credential removed or session dropped: refuse everything from now on.
    pub fn shutdown(&mut self) {
        self.intake.close();
        self.state = SessionState::Idle;
    }
}
