use crate::session::state::{ConnectionState, SessionState};
use crate::stream::StreamViews;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tokio::sync::watch;

/// Change notification for published views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewsUpdated {
    /// Bumped on every publish.
    pub revision: u64,
    pub epoch: u64,
}

/// Write side of the published views and state. Only the session writes.
#[derive(Debug, Clone)]
pub(crate) struct Publisher {
    views: Arc<ArcSwap<StreamViews>>,
    state: Arc<watch::Sender<SessionState>>,
    updates: Arc<watch::Sender<ViewsUpdated>>,
}

impl Publisher {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        let (updates, _) = watch::channel(ViewsUpdated::default());
        Self {
            views: Arc::new(ArcSwap::from_pointee(StreamViews::default())),
            state: Arc::new(state),
            updates: Arc::new(updates),
        }
    }

    pub(crate) fn publish_views(&self, views: StreamViews) {
        let epoch = views.epoch;
        self.views.store(Arc::new(views));
        self.updates.send_modify(|u| {
            u.revision += 1;
            u.epoch = epoch;
        });
    }

    pub(crate) fn publish_state(&self, next: SessionState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    pub(crate) fn handle(&self) -> ViewHandle {
        ViewHandle {
            publisher: self.clone(),
        }
    }
}

/// Read-only access for the rendering layer.
///
/// Every snapshot is an immutable `Arc`; holding one never blocks the
/// session, and the session never mutates what a reader holds.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    publisher: Publisher,
}

impl ViewHandle {
    pub fn views(&self) -> Arc<StreamViews> {
        self.publisher.views.load_full()
    }

    pub fn session_state(&self) -> SessionState {
        *self.publisher.state.borrow()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.session_state().connection_state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.publisher.state.subscribe()
    }

    /// Notified after every tick and every filter reset.
    pub fn subscribe_views(&self) -> watch::Receiver<ViewsUpdated> {
        self.publisher.updates.subscribe()
    }
}
