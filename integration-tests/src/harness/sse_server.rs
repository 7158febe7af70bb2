use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// `Basic` header value for `user:password`.
pub const VALID_AUTHORIZATION: &str = "Basic dXNlcjpwYXNzd29yZA==";

/// What the server does with each accepted request.
#[derive(Debug, Clone)]
pub enum Script {
    /// 200 + every frame, then keep the connection open.
    Stream { frames: Vec<String> },
    /// 200 + every frame, then close.
    StreamThenClose { frames: Vec<String> },
    /// Reply with a bare status and close.
    Status(u16),
}

/// One-route `text/event-stream` server on an ephemeral localhost port.
///
/// Requests without [`VALID_AUTHORIZATION`] get a 401 regardless of the
/// script.
pub struct SseServer {
    url: Url,
    requests: Arc<Mutex<Vec<String>>>,
    accept: JoinHandle<()>,
}

impl SseServer {
    pub async fn start(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind sse server");
        let addr = listener.local_addr().expect("no local addr");
        let url = Url::parse(&format!("http://{addr}/api/stream/access")).expect("bad url");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let accept = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(serve(stream, script.clone(), seen.clone()));
            }
        });

        Self {
            url,
            requests,
            accept,
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Raw request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for SseServer {
    fn drop(&mut self) {
        self.accept.abort();
    }
}

/// A single `access` event frame.
pub fn access_frame(json: &str) -> String {
    format!("event: access\ndata: {json}\n\n")
}

async fn serve(mut stream: TcpStream, script: Script, seen: Arc<Mutex<Vec<String>>>) {
    let Some(head) = read_head(&mut stream).await else {
        return;
    };
    let authorized = head.lines().any(|line| match line.split_once(':') {
        Some((name, value)) => {
            name.eq_ignore_ascii_case("authorization") && value.trim() == VALID_AUTHORIZATION
        }
        None => false,
    });
    seen.lock().unwrap().push(head);

    if !authorized {
        let _ = stream.write_all(&status_response(401)).await;
        return;
    }

    let (frames, keep_open) = match script {
        Script::Status(code) => {
            let _ = stream.write_all(&status_response(code)).await;
            return;
        }
        Script::Stream { frames } => (frames, true),
        Script::StreamThenClose { frames } => (frames, false),
    };

    let head = "HTTP/1.1 200 OK\r\n\
                Content-Type: text/event-stream\r\n\
                Cache-Control: no-cache\r\n\
                Connection: close\r\n\r\n";
    if stream.write_all(head.as_bytes()).await.is_err() {
        return;
    }
    for frame in frames {
        if stream.write_all(frame.as_bytes()).await.is_err() {
            return;
        }
        let _ = stream.flush().await;
        // Let frames arrive as separate chunks.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    if keep_open {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
    let _ = stream.shutdown().await;
}

async fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}

fn status_response(code: u16) -> Vec<u8> {
    format!("HTTP/1.1 {code} Test\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").into_bytes()
}
