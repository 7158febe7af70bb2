use crate::cli::watch::render::{redraw, render_dashboard, render_json};
use crate::conf::{StreamConfig, load_config};
use crate::filter::StreamFilter;
use crate::session::{Credential, DisconnectReason, SessionState, StreamSession, ViewHandle};
use crate::transport::{JsonLinesTransport, SseTransport, Transport};
use anyhow::{Context, Result, anyhow};
use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::info;
use url::Url;

#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    /// TOML config file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SSE endpoint publishing `access` events
    #[arg(long, conflicts_with = "stdin")]
    pub endpoint: Option<Url>,

    /// Basic auth user name
    #[arg(long, short = 'u', env = "ACCESSWATCH_USER")]
    pub user: Option<String>,

    /// Basic auth password
    #[arg(long, env = "ACCESSWATCH_PASSWORD", hide_env_values = true, requires = "user")]
    pub password: Option<String>,

    /// Read newline-delimited JSON access records from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Case-insensitive host substring
    #[arg(long)]
    pub host: Option<String>,

    /// Case-insensitive path substring
    #[arg(long)]
    pub path: Option<String>,

    /// Exact HTTP method
    #[arg(long)]
    pub method: Option<String>,

    /// Tick interval in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Emit one JSON snapshot per tick instead of the dashboard
    #[arg(long)]
    pub json: bool,

    /// Exit once the source ends the stream, cleanly or with an error
    #[arg(long)]
    pub exit_on_close: bool,
}

impl WatchArgs {
    /// Config file (or defaults) with every flag applied, validated.
    pub fn resolve_config(&self) -> Result<StreamConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => StreamConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            cfg.stream.endpoint = Some(endpoint.clone());
        }
        if let Some(tick_ms) = self.tick_ms {
            cfg.stream.tick_interval_ms = tick_ms;
        }
        if let Some(host) = &self.host {
            cfg.filter.host = host.clone();
        }
        if let Some(path) = &self.path {
            cfg.filter.path = path.clone();
        }
        if let Some(method) = &self.method {
            cfg.filter.method = method.to_ascii_uppercase();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn credential(&self) -> Credential {
        match &self.user {
            Some(user) => Credential::basic(user, self.password.clone().unwrap_or_default()),
            None => Credential::Anonymous,
        }
    }
}

pub async fn run_watch(args: WatchArgs) -> Result<()> {
    let cfg = args.resolve_config()?;
    let output = Output {
        json: args.json,
        color: !args.json && io::stdout().is_terminal(),
    };

    if args.stdin {
        info!("reading access records from stdin");
        return watch(
            JsonLinesTransport::stdin(),
            Credential::Anonymous,
            cfg,
            output,
            args.exit_on_close,
        )
        .await;
    }

    let endpoint = cfg
        .stream
        .endpoint
        .clone()
        .context("no event source: pass --endpoint, set stream.endpoint or use --stdin")?;
    info!(%endpoint, "subscribing to access stream");
    let transport = SseTransport::new(endpoint)?;
    watch(
        transport,
        args.credential(),
        cfg,
        output,
        args.exit_on_close,
    )
    .await
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
    color: bool,
}

/// Run one session and draw every published snapshot until Ctrl-C.
async fn watch<T: Transport>(
    transport: T,
    credential: Credential,
    cfg: StreamConfig,
    output: Output,
    exit_on_close: bool,
) -> Result<()> {
    let mut session = StreamSession::new(transport, cfg.stream, cfg.filter);
    let handle = session.handle();
    let mut updates = handle.subscribe_views();
    let mut states = handle.subscribe_state();

    session.start(credential).await;

    if !output.json {
        // Hide cursor while the dashboard runs.
        print!("\x1b[?25l");
        let _ = io::stdout().flush();
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // Set once the source ended; one more tick flushes what it sent last.
    let mut finishing: Option<Result<()>> = None;

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Ok(()),

            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                draw(&handle, session.filter(), output)?;
                if let Some(outcome) = finishing.take() {
                    break outcome;
                }
            }

            changed = states.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let state = *states.borrow_and_update();
                draw(&handle, session.filter(), output)?;
                match state_action(state, exit_on_close) {
                    StateAction::Continue => {}
                    StateAction::Reject => {
                        break Err(anyhow!("event stream rejected the credential"));
                    }
                    StateAction::FinishAfterTick => finishing = Some(Ok(())),
                    StateAction::FailAfterTick => {
                        finishing = Some(Err(anyhow!("event stream ended with an error")));
                    }
                }
            }
        }
    };

    session.stop().await;

    if !output.json {
        print!("\x1b[?25h");
        let _ = io::stdout().flush();
    }

    outcome
}

/// What `watch` does when the session state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateAction {
    Continue,
    /// Credential rejected: stop now with an error.
    Reject,
    /// Source closed cleanly: exit after the next tick.
    FinishAfterTick,
    /// Source failed: exit with an error after the next tick.
    FailAfterTick,
}

pub(crate) fn state_action(state: SessionState, exit_on_close: bool) -> StateAction {
    match state {
        SessionState::Disconnected(DisconnectReason::Unauthorized) => StateAction::Reject,
        SessionState::Disconnected(DisconnectReason::Closed) if exit_on_close => {
            StateAction::FinishAfterTick
        }
        SessionState::Disconnected(DisconnectReason::Error) if exit_on_close => {
            StateAction::FailAfterTick
        }
        _ => StateAction::Continue,
    }
}

fn draw(handle: &ViewHandle, filter: &StreamFilter, output: Output) -> Result<()> {
    let views = handle.views();
    let state = handle.connection_state();

    if output.json {
        let line = render_json(&views, state, filter).context("failed to encode snapshot")?;
        println!("{line}");
        return Ok(());
    }

    redraw(&render_dashboard(&views, state, filter, output.color));
    Ok(())
}
