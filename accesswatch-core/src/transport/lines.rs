use crate::session::Credential;
use crate::transport::{SignalSink, Transport, TransportError};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

/// Reads newline-delimited JSON access records from a reader.
///
/// The reader can only be consumed once; a second subscription fails with
/// [`TransportError::Exhausted`]. Blank and non-JSON lines are skipped.
pub struct JsonLinesTransport<R> {
    reader: Mutex<Option<R>>,
}

impl<R> JsonLinesTransport<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
        }
    }
}

impl JsonLinesTransport<Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R> Transport for JsonLinesTransport<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    async fn run(&self, _credential: Credential, sink: SignalSink) -> Result<(), TransportError> {
        let Some(reader) = self.reader.lock().await.take() else {
            return Err(TransportError::Exhausted);
        };

        sink.opened();

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut dropped = 0u64;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            // Invalid UTF-8 only spoils its own line; the JSON parse drops it.
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !sink.push_raw(line) {
                dropped += 1;
            }
            if sink.is_closed() {
                break;
            }
        }

        debug!(dropped, "line source ended");
        Ok(())
    }
}
