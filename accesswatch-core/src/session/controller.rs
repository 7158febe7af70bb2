use crate::conf::StreamSettings;
use crate::filter::StreamFilter;
use crate::session::core::SessionCore;
use crate::session::credential::Credential;
use crate::session::driver::{Command, SessionDriver};
use crate::session::guard::TaskGuard;
use crate::session::publish::{Publisher, ViewHandle};
use crate::session::state::{ConnectionState, SessionState};
use crate::stream::StreamViews;
use crate::transport::{SignalSink, Transport};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Owns the transport subscription, the recurring tick and filter epochs.
///
/// One transport subscription runs per credential. Filter changes reset the
/// aggregates without touching the subscription; removing the credential
/// tears both the subscription and the tick down.
pub struct StreamSession<T: Transport> {
    transport: Arc<T>,
    settings: StreamSettings,
    filter: StreamFilter,
    publisher: Publisher,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    id: Uuid,
    credential: Credential,
    commands: mpsc::UnboundedSender<Command>,
    driver: JoinHandle<()>,
}

impl<T: Transport> StreamSession<T> {
    pub fn new(transport: T, settings: StreamSettings, filter: StreamFilter) -> Self {
        Self {
            transport: Arc::new(transport),
            settings,
            filter,
            publisher: Publisher::new(),
            active: None,
        }
    }

    /// Read-only handle for renderers; stays valid across restarts.
    pub fn handle(&self) -> ViewHandle {
        self.publisher.handle()
    }

    pub fn views(&self) -> Arc<StreamViews> {
        self.handle().views()
    }

    pub fn session_state(&self) -> SessionState {
        self.handle().session_state()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.handle().connection_state()
    }

    pub fn filter(&self) -> &StreamFilter {
        &self.filter
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Credential became present.
    ///
    /// A different credential, or the same one after it was rejected, tears the
    /// running session down and opens a fresh one with empty aggregates.
    pub async fn start(&mut self, credential: Credential) {
        if let Some(active) = &self.active {
            if active.credential == credential && !self.session_state().is_terminal() {
                return;
            }
        }
        self.stop().await;

        let id = Uuid::new_v4();
        let span = info_span!("session", %id);
        let core = SessionCore::new(self.filter.clone(), &self.settings);

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let sink = SignalSink::new(core.intake().clone(), signal_tx);
        let transport = tokio::spawn(
            run_transport(Arc::clone(&self.transport), credential.clone(), sink)
                .instrument(span.clone()),
        );

        self.publisher.publish_state(core.state());
        self.publisher.publish_views(core.snapshot());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let driver = SessionDriver::new(
            id,
            core,
            self.publisher.clone(),
            self.settings.tick_interval(),
        );
        let driver = tokio::spawn(
            driver
                .run(command_rx, signal_rx, TaskGuard::new(transport))
                .instrument(span),
        );

        info!(session = %id, filter = ?self.filter, "stream session started");
        self.active = Some(ActiveSession {
            id,
            credential,
            commands: command_tx,
            driver,
        });
    }

    /// Credential became absent, or the host is shutting down.
    ///
    /// Returns once the driver has exited: no tick runs after this and the
    /// transport subscription is gone.
    pub async fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let _ = active.commands.send(Command::Shutdown);
        if let Err(err) = active.driver.await {
            if err.is_panic() {
                error!(session = %active.id, "session driver panicked");
            }
        }

        self.publisher.publish_state(SessionState::Idle);
        self.publisher.publish_views(StreamViews::default());
        info!(session = %active.id, "stream session stopped");
    }

    /// Follow the credential provider: present starts (or restarts), absent stops.
    pub async fn set_credential(&mut self, credential: Option<Credential>) {
        match credential {
            Some(credential) => self.start(credential).await,
            None => self.stop().await,
        }
    }

    /// Replace the filter.
    ///
    /// A different value resets every aggregate; when this returns the reset
    /// has been applied and published, so no later tick can show stale-epoch
    /// events. The transport subscription is left alone.
    pub async fn set_filter(&mut self, filter: StreamFilter) {
        if filter == self.filter {
            return;
        }
        self.filter = filter.clone();

        let Some(active) = &self.active else {
            debug!(filter = ?self.filter, "no active session, filter kept for the next one");
            return;
        };

        let (ack, done) = oneshot::channel();
        if active
            .commands
            .send(Command::SetFilter { filter, ack })
            .is_err()
        {
            warn!(session = %active.id, "session driver gone, filter not applied");
            return;
        }
        let _ = done.await;
    }
}

impl<T: Transport> Drop for StreamSession<T> {
    fn drop(&mut self) {
        // The driver owns the transport guard, so aborting it stops both.
        if let Some(active) = self.active.take() {
            active.driver.abort();
        }
    }
}

/// Run one subscription and translate how it ended into a lifecycle signal.
async fn run_transport<T: Transport>(transport: Arc<T>, credential: Credential, sink: SignalSink) {
    match transport.run(credential, sink.clone()).await {
        Ok(()) => sink.closed(),
        Err(err) if err.is_unauthorized() => {
            warn!(error = %err, "event stream rejected credential");
            sink.unauthorized();
        }
        Err(err) => {
            warn!(error = %err, "event stream failed");
            sink.error(err.to_string());
        }
    }
}
