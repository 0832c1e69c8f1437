// Shared helpers for eagle-core integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use wiremock::MockServer;

use eagle_core::{Endpoint, SessionConfig, TransportConfig};

// ── Session config ──────────────────────────────────────────────────

/// Session config pointing at `addr`, with millisecond pacing.
pub fn fast_config(addr: SocketAddr, poll_interval: Duration) -> SessionConfig {
    SessionConfig {
        endpoint: Endpoint::new(addr.ip().to_string(), addr.port()),
        poll_interval,
        connect_attempts: 5,
        startup_delay: Duration::from_millis(1),
        retry_delay: Duration::from_millis(5),
        transport: TransportConfig {
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
            accept_invalid_certs: true,
        },
    }
}

/// Poll interval long enough that the poller never fires during a test.
pub const QUIET: Duration = Duration::from_secs(3600);

// ── Device payloads ─────────────────────────────────────────────────

pub fn connected(temp: f64, hum: f64, pressure: f64, dew: f64) -> Value {
    json!({
        "result": "OK",
        "ecco": "Connected",
        "temp": temp,
        "hum": hum,
        "pressure": pressure,
        "dew": dew
    })
}

pub fn idle() -> Value {
    json!({ "result": "OK", "ecco": "Idle" })
}

pub fn failed() -> Value {
    json!({ "result": "ERROR" })
}

pub fn info(firmware: &str) -> Value {
    json!({ "result": "OK", "firmwareversion": firmware })
}

/// How many requests the mock server has seen for `path`.
pub async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}

// ── Counting device ─────────────────────────────────────────────────

/// Minimal HTTP device that records how many requests overlap.
///
/// Every request is held for `delay` before it is answered, so two
/// refreshes running at once would show up as `max_in_flight() > 1`.
pub struct CountingDevice {
    pub addr: SocketAddr,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    requests: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl CountingDevice {
    pub async fn start(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(AtomicUsize::new(0));

        let counters = (
            Arc::clone(&in_flight),
            Arc::clone(&max_in_flight),
            Arc::clone(&requests),
        );
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let (in_flight, max_in_flight, requests) = (
                    Arc::clone(&counters.0),
                    Arc::clone(&counters.1),
                    Arc::clone(&counters.2),
                );
                tokio::spawn(async move {
                    serve(stream, delay, &in_flight, &max_in_flight, &requests).await;
                });
            }
        });

        Self {
            addr,
            in_flight,
            max_in_flight,
            requests,
            task,
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for CountingDevice {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    delay: Duration,
    in_flight: &AtomicUsize,
    max_in_flight: &AtomicUsize,
    requests: &AtomicUsize,
) {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_owned();

    requests.fetch_add(1, Ordering::SeqCst);
    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    max_in_flight.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(delay).await;
    in_flight.fetch_sub(1, Ordering::SeqCst);

    let body = match path.as_str() {
        "/getinfo" => info("9.9.9"),
        "/getecco" => connected(20.0, 50.0, 1000.0, 9.0),
        _ => json!({ "result": "OK" }),
    }
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
