//! Shared fixtures for the mocked, integration and end-to-end tiers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use page_tracker::{router, CounterKey, CounterService, CounterStore, RedisCounterStore};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Upper bound for one request in the integration tier.
pub const REQUEST_BUDGET: Duration = Duration::from_millis(1500);

/// Router driven in-process, without a socket.
pub fn in_process_app(service: Arc<CounterService>) -> Router {
    router(service)
}

/// Issue `GET /` through the in-process router.
pub async fn get_root(app: &Router) -> (StatusCode, String) {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Redis URL for the integration tier.
pub fn redis_url() -> String {
    std::env::var("REDIS_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| page_tracker::config::DEFAULT_REDIS_URL.to_string())
}

/// Counter key no other test run will touch.
pub fn unique_key() -> CounterKey {
    CounterKey::new(format!("test:page_views:{}", uuid::Uuid::new_v4()))
}

/// A Redis store that has answered a command.
///
/// # Panics
/// Panics with a message naming the URL when Redis cannot be reached, so an
/// absent server is never mistaken for a failing assertion.
pub async fn live_store(url: &str) -> Arc<RedisCounterStore> {
    let store = RedisCounterStore::open(url)
        .unwrap_or_else(|e| panic!("invalid Redis URL {}: {}", url, e));

    let reachable = tokio::time::timeout(REQUEST_BUDGET, store.get(&CounterKey::default())).await;
    match reachable {
        Ok(Ok(_)) => Arc::new(store),
        Ok(Err(e)) => panic!(
            "Redis is not reachable at {}: {} (start a server or set REDIS_URL)",
            url, e
        ),
        Err(_) => panic!(
            "Redis is not reachable at {}: no reply within {:?}",
            url, REQUEST_BUDGET
        ),
    }
}

/// Deployed service and store targeted by the end-to-end tier.
#[derive(Debug, Clone)]
pub struct E2eTarget {
    pub base_url: String,
    pub redis_url: String,
}

impl E2eTarget {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    /// Read `PAGE_TRACKER_E2E_URL` and `PAGE_TRACKER_E2E_REDIS_URL`.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            base_url: var("PAGE_TRACKER_E2E_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            redis_url: var("PAGE_TRACKER_E2E_REDIS_URL")
                .unwrap_or_else(|| page_tracker::config::DEFAULT_REDIS_URL.to_string()),
        }
    }

    /// URL of the page view endpoint.
    pub fn root_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}

/// Local RESP server that answers the commands the counter store issues.
///
/// Holds one integer counter shared by every connection. With `close_after`
/// set, each connection is closed after that many `INCR` replies, which
/// looks to the client like Redis going away under it.
pub struct FakeRedis {
    addr: SocketAddr,
    value: Arc<Mutex<Option<i64>>>,
    connections: Arc<AtomicUsize>,
    incrs: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl FakeRedis {
    pub async fn start(close_after: Option<usize>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let value = Arc::new(Mutex::new(None));
        let connections = Arc::new(AtomicUsize::new(0));
        let incrs = Arc::new(AtomicUsize::new(0));

        let task = {
            let value = value.clone();
            let connections = connections.clone();
            let incrs = incrs.clone();
            tokio::spawn(async move {
                while let Ok((socket, _)) = listener.accept().await {
                    connections.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(serve_connection(
                        socket,
                        value.clone(),
                        incrs.clone(),
                        close_after,
                    ));
                }
            })
        };

        Self {
            addr,
            value,
            connections,
            incrs,
            task,
        }
    }

    pub fn url(&self) -> String {
        format!("redis://{}/0", self.addr)
    }

    /// Connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// `INCR` commands answered so far.
    pub fn incrs(&self) -> usize {
        self.incrs.load(Ordering::SeqCst)
    }

    pub fn value(&self) -> Option<i64> {
        *self.value.lock().unwrap()
    }
}

impl Drop for FakeRedis {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_connection(
    socket: TcpStream,
    value: Arc<Mutex<Option<i64>>>,
    incrs: Arc<AtomicUsize>,
    close_after: Option<usize>,
) {
    let (read, mut write) = socket.into_split();
    let mut reader = BufReader::new(read);
    let mut served = 0;

    while let Ok(Some(args)) = read_command(&mut reader).await {
        let command = args.first().map(|a| a.to_ascii_uppercase()).unwrap_or_default();
        let reply = match command.as_str() {
            "INCR" => {
                let mut value = value.lock().unwrap();
                let next = value.unwrap_or(0) + 1;
                *value = Some(next);
                incrs.fetch_add(1, Ordering::SeqCst);
                served += 1;
                format!(":{}\r\n", next)
            }
            "GET" => match *value.lock().unwrap() {
                Some(v) => {
                    let text = v.to_string();
                    format!("${}\r\n{}\r\n", text.len(), text)
                }
                None => "$-1\r\n".to_string(),
            },
            "SET" => {
                if let Some(v) = args.get(2).and_then(|v| v.parse().ok()) {
                    *value.lock().unwrap() = Some(v);
                }
                "+OK\r\n".to_string()
            }
            "PING" => "+PONG\r\n".to_string(),
            _ => "+OK\r\n".to_string(),
        };

        if write.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
        if close_after.is_some_and(|limit| served >= limit) {
            return;
        }
    }
}

/// Read one RESP array command, or None at end of stream.
async fn read_command<R>(reader: &mut R) -> io::Result<Option<Vec<String>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let count = parse_header(&line, '*')?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await?;
        let len = parse_header(&line, '$')?;
        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await?;
        args.push(String::from_utf8_lossy(&buf[..len]).into_owned());
    }
    Ok(Some(args))
}

fn parse_header(line: &str, marker: char) -> io::Result<usize> {
    line.trim_end()
        .strip_prefix(marker)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, line.to_string()))
}
