//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dashboard_client::config::ClientConfig;
use dashboard_client::ui::{
    DeferredNavigator, NotificationCenter, Notifier, ProgressHandle, ProgressMode,
    ProgressReporter,
};
use dashboard_client::{AppContext, Collaborators, Dashboard, Session};

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    /// Content-Length to announce instead of the real body length.
    pub declared_length: Option<usize>,
}

impl MockResponse {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into().into_bytes(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            declared_length: None,
        }
    }

    pub fn bytes(status: u16, body: Vec<u8>, content_type: &str) -> Self {
        Self {
            status,
            body,
            headers: vec![("Content-Type".into(), content_type.into())],
            declared_length: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Announce `length` bytes but close the connection after the real body.
    pub fn truncated(mut self, length: usize) -> Self {
        self.declared_length = Some(length);
        self
    }
}

/// Handle on a running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        serve(socket, f.as_ref(), &log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend { addr, requests }
}

/// Backend that answers with the given responses in order, repeating the last.
pub async fn start_scripted_backend(script: Vec<MockResponse>) -> MockBackend {
    let next = AtomicUsize::new(0);
    start_programmable_backend(move |_| {
        let i = next.fetch_add(1, Ordering::SeqCst).min(script.len() - 1);
        script[i].clone()
    })
    .await
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve<F>(mut socket: TcpStream, f: &F, log: &Mutex<Vec<RecordedRequest>>)
where
    F: Fn(&RecordedRequest) -> MockResponse,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    let response = f(&request);
    log.lock().unwrap().push(request);

    let mut head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.declared_length.unwrap_or(response.body.len())
    );
    for (k, v) in &response.headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    head.push_str("\r\n");

    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&response.body).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let mut body = buf[header_end + 4..].to_vec();

    if let Some(len) = header("content-length").and_then(|v| v.parse::<usize>().ok()) {
        while body.len() < len {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    } else if header("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
        while !body.ends_with(b"0\r\n\r\n") {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
        body = decode_chunked(&body);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn decode_chunked(mut raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(line_end) = find(raw, b"\r\n") {
        let size_str = String::from_utf8_lossy(&raw[..line_end]);
        let size = usize::from_str_radix(size_str.trim(), 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        let end = (start + size).min(raw.len());
        out.extend_from_slice(&raw[start..end]);
        raw = &raw[(end + 2).min(raw.len())..];
    }
    out
}

/// Progress reporter that records every indicator it shows.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Arc<Mutex<Vec<String>>>,
}

struct RecordingHandle {
    target: String,
    events: Arc<Mutex<Vec<String>>>,
}

impl ProgressHandle for RecordingHandle {
    fn update(&mut self, percent: f64) {
        self.events
            .lock()
            .unwrap()
            .push(format!("update {} {}", self.target, percent.round()));
    }

    fn hide(self: Box<Self>) {
        self.events.lock().unwrap().push(format!("hide {}", self.target));
    }
}

impl ProgressReporter for RecordingProgress {
    fn show(&self, target: &str, mode: ProgressMode) -> Box<dyn ProgressHandle> {
        self.events
            .lock()
            .unwrap()
            .push(format!("show {} {:?}", target, mode));
        Box::new(RecordingHandle {
            target: target.to_string(),
            events: self.events.clone(),
        })
    }
}

/// A dashboard wired to in-memory collaborators.
pub struct TestDashboard {
    pub dashboard: Dashboard,
    pub notifications: Arc<NotificationCenter>,
    pub redirects: Arc<Mutex<Vec<String>>>,
    pub progress: Arc<Mutex<Vec<String>>>,
}

/// Config pointed at `base_url` with short retry delays.
pub fn test_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.request_timeout_secs = 5;
    config.retries.base_delay_ms = 10;
    config.notifications.auth_redirect_delay_ms = 50;
    config
}

pub fn test_dashboard(config: ClientConfig, token: Option<&str>) -> TestDashboard {
    let notifications = Arc::new(NotificationCenter::new(Duration::from_secs(3600)));
    let notifier: Arc<dyn Notifier> = notifications.clone();
    let redirects = Arc::new(Mutex::new(Vec::new()));
    let sink = redirects.clone();
    let progress = RecordingProgress::default();
    let events = progress.events.clone();

    let session = match token {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };
    let ctx = AppContext::new(
        config,
        Collaborators {
            notifier,
            navigator: Arc::new(DeferredNavigator::new(move |path| {
                sink.lock().unwrap().push(path.to_string())
            })),
            progress: Arc::new(progress),
        },
    )
    .with_session(Arc::new(session));

    TestDashboard {
        dashboard: Dashboard::new(ctx).unwrap(),
        notifications,
        redirects,
        progress: events,
    }
}
