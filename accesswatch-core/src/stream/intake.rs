use crate::event::AccessEvent;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Holding area for events that arrived since the last tick.
///
/// Cloning yields another handle to the same buffer: the transport side pushes,
/// the tick side drains. A single mutex serializes the two so no event is lost
/// or duplicated, and arrival order is kept. There is no cap here; bounding
/// happens downstream in the recent-event log.
#[derive(Debug, Clone, Default)]
pub struct IntakeBuffer {
    inner: Arc<Mutex<IntakeState>>,
}

#[derive(Debug, Default)]
struct IntakeState {
    events: Vec<AccessEvent>,
    closed: bool,
    rejected: u64,
}

impl IntakeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Returns `false` if the buffer was closed.
    pub fn push(&self, event: AccessEvent) -> bool {
        let mut state = self.lock();
        if state.closed {
            state.rejected += 1;
            trace!(rejected = state.rejected, "intake closed, event rejected");
            return false;
        }
        state.events.push(event);
        true
    }

    /// Take every buffered event in arrival order, leaving the buffer empty.
    pub fn drain(&self) -> Vec<AccessEvent> {
        mem::take(&mut self.lock().events)
    }

    /// Discard buffered events and refuse any further pushes.
    ///
    /// Returns how many buffered events were discarded.
    pub fn close(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;
        let discarded = state.events.len();
        state.events = Vec::new();
        discarded
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    /// Pushes refused since the buffer was closed.
    pub fn rejected(&self) -> u64 {
        self.lock().rejected
    }

    fn lock(&self) -> MutexGuard<'_, IntakeState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still safe to use.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
