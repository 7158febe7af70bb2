use crate::filter::StreamFilter;
use crate::session::core::SessionCore;
use crate::session::guard::TaskGuard;
use crate::session::publish::Publisher;
use crate::transport::TransportSignal;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};
use uuid::Uuid;

pub(crate) enum Command {
    SetFilter {
        filter: StreamFilter,
        ack: oneshot::Sender<()>,
    },
    Shutdown,
}

/// The single logical thread of control for one session.
///
/// Commands win over lifecycle signals, which win over ticks, so a reset or a
/// shutdown is always handled before a tick that became ready at the same time.
pub(crate) struct SessionDriver {
    id: Uuid,
    core: SessionCore,
    publisher: Publisher,
    tick_interval: Duration,
}

impl SessionDriver {
    pub(crate) fn new(
        id: Uuid,
        core: SessionCore,
        publisher: Publisher,
        tick_interval: Duration,
    ) -> Self {
        Self {
            id,
            core,
            publisher,
            tick_interval,
        }
    }

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut signals: mpsc::UnboundedReceiver<TransportSignal>,
        transport: TaskGuard,
    ) {
        // First tick one full interval after start.
        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::SetFilter { filter, ack }) => {
                        self.set_filter(filter);
                        let _ = ack.send(());
                    }
                    Some(Command::Shutdown) | None => break,
                },

                Some(signal) = signals.recv() => self.on_signal(signal, &transport),

                _ = ticker.tick() => self.tick(),
            }
        }

        self.core.shutdown();
        drop(transport);
        debug!(session = %self.id, "session driver stopped");
    }

    fn on_signal(&mut self, signal: TransportSignal, transport: &TaskGuard) {
        let previous = self.core.state();
        if !self.core.on_signal(&signal) {
            debug!(session = %self.id, ?signal, state = %previous, "signal ignored");
            return;
        }

        let state = self.core.state();
        info!(session = %self.id, from = %previous, to = %state, "connection state changed");
        if state.is_terminal() {
            transport.abort();
        }
        self.publisher.publish_state(state);
    }

    fn set_filter(&mut self, filter: StreamFilter) {
        if !self.core.set_filter(filter) {
            return;
        }
        info!(
            session = %self.id,
            epoch = self.core.epoch(),
            filter = ?self.core.filter(),
            "filter changed, aggregates reset"
        );
        self.publisher.publish_views(self.core.snapshot());
    }

    fn tick(&mut self) {
        let report = self.core.tick(Utc::now());
        trace!(
            session = %self.id,
            drained = report.drained,
            retained = report.retained,
            unclassified = report.unclassified,
            "tick"
        );
        self.publisher.publish_views(self.core.snapshot());
    }
}
