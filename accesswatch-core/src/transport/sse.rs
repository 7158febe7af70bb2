use crate::session::Credential;
use crate::transport::{SignalSink, Transport, TransportError};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::mem;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Server-sent event name carrying one JSON access record.
pub const ACCESS_EVENT_NAME: &str = "access";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name, "message" when the stream did not set one.
    pub event: String,
    pub data: String,
}

/// Longest line the decoder buffers before dropping the event it belongs to.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Incremental `text/event-stream` decoder.
///
/// Accepts arbitrary chunk boundaries, including ones that split a UTF-8
/// sequence. Lines end in `\n` or `\r\n`; a blank line dispatches the pending
/// event. `id:` and `retry:` are accepted and ignored. A line longer than the
/// limit discards the whole event it is part of.
#[derive(Debug)]
pub struct SseDecoder {
    line: Vec<u8>,
    max_line: usize,
    /// Current line overflowed; ignore bytes until its newline.
    overflow: bool,
    /// Current event lost a line; ignore it until the blank line.
    skip_event: bool,
    event: String,
    data: String,
    has_data: bool,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            line: Vec::new(),
            max_line,
            overflow: false,
            skip_event: false,
            event: String::new(),
            data: String::new(),
            has_data: false,
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut out = Vec::new();
        for &byte in chunk {
            if byte != b'\n' {
                if self.overflow {
                    continue;
                }
                self.line.push(byte);
                if self.line.len() > self.max_line {
                    debug!(limit = self.max_line, "event stream line too long, dropping event");
                    self.line = Vec::new();
                    self.overflow = true;
                }
                continue;
            }
            if mem::take(&mut self.overflow) {
                self.skip_event = true;
                continue;
            }
            let mut line = mem::take(&mut self.line);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(event) = self.process_line(&line) {
                out.push(event);
            }
        }
        out
    }

    fn process_line(&mut self, line: &[u8]) -> Option<SseEvent> {
        if line.is_empty() {
            if mem::take(&mut self.skip_event) {
                self.event.clear();
                self.data.clear();
                self.has_data = false;
                return None;
            }
            return self.dispatch();
        }
        if self.skip_event {
            return None;
        }

        let line = String::from_utf8_lossy(line);
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (&line[..], ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = mem::take(&mut self.event);
        if !self.has_data {
            return None;
        }
        self.has_data = false;

        Some(SseEvent {
            event: if event.is_empty() {
                "message".to_string()
            } else {
                event
            },
            data: mem::take(&mut self.data),
        })
    }
}

/// Subscribes to an HTTP Server-Sent-Events endpoint.
///
/// 401/403 map to [`TransportError::Unauthorized`]; any other non-success
/// status, connect failure or body failure is a transient error. No retries
/// happen here: one call to `run` is one subscription.
#[derive(Debug, Clone)]
pub struct SseTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl SseTransport {
    pub fn new(endpoint: Url) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(TransportError::Connect)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for SseTransport {
    async fn run(&self, credential: Credential, sink: SignalSink) -> Result<(), TransportError> {
        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Credential::Basic { username, password } = &credential {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(TransportError::Connect)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        info!(endpoint = %self.endpoint, "event stream opened");
        sink.opened();

        let mut decoder = SseDecoder::new();
        let mut body = Box::pin(response.bytes_stream());
        let mut dropped = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(TransportError::Body)?;
            for event in decoder.feed(&chunk) {
                if event.event != ACCESS_EVENT_NAME {
                    continue;
                }
                if !sink.push_raw(&event.data) {
                    dropped += 1;
                }
            }
            if sink.is_closed() {
                debug!(dropped, "session stopped accepting events, leaving stream");
                return Ok(());
            }
        }

        debug!(dropped, "event stream ended");
        Ok(())
    }
}
