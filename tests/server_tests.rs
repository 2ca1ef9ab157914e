//! Serves the wiki on a real socket and talks raw HTTP/1.1 to it.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use wiki_server::server::{create_listener, start_server_loop, SignalHandler};
use wiki_server::{AppState, Config, TemplateSet};

const HEALTH_KEEP_ALIVE: &str = "GET /healthz HTTP/1.1\r\nHost: localhost\r\n\r\n";
const HEALTH_CLOSE: &str = "GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";

struct TestServer {
    addr: SocketAddr,
    signals: Arc<SignalHandler>,
    handle: JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    fn start(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_string_lossy().into_owned();
        config.logging.access_log = false;
        config.performance.shutdown_timeout = 2;
        configure(&mut config);

        let templates =
            TemplateSet::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("templates")).unwrap();
        let state = Arc::new(AppState::new(config, templates).unwrap());

        let listener = create_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let handle = tokio::spawn(start_server_loop(listener, state, Arc::clone(&signals)));

        Self {
            addr,
            signals,
            handle,
            _dir: dir,
        }
    }

    async fn stop(self) {
        self.signals.request_shutdown();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server loop did not stop")
            .unwrap();
    }
}

async fn roundtrip(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    // A connection dropped on accept may already be reset
    if stream.write_all(request.as_bytes()).await.is_err() {
        return String::new();
    }
    read_until_closed(&mut stream).await
}

/// Read until the server closes the connection; a reset reads as empty
async fn read_until_closed(stream: &mut TcpStream) -> String {
    let mut response = Vec::new();
    let result = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("server did not close the connection");
    if result.is_err() {
        response.clear();
    }
    String::from_utf8_lossy(&response).to_ascii_lowercase()
}

/// Read one response head from a connection that stays open
async fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
            .await
            .expect("no response")
            .unwrap();
        assert!(n > 0, "connection closed before a response");
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).to_ascii_lowercase()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_serves_and_shuts_down() {
    let server = TestServer::start(|_| {});
    let addr = server.addr;

    let resp = roundtrip(
        addr,
        "GET /view/Hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(resp.starts_with("http/1.1 302"));
    assert!(resp.contains("location: /edit/hello"));

    let body = "body=Hi+there";
    let resp = roundtrip(
        addr,
        &format!(
            "POST /save/Hello HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(resp.starts_with("http/1.1 302"));

    let resp = roundtrip(
        addr,
        "GET /view/Hello HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(resp.starts_with("http/1.1 200"));
    assert!(resp.contains("hi there"));

    server.stop().await;
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_connections_over_limit_are_dropped() {
    let server = TestServer::start(|config| config.performance.max_connections = Some(1));
    let addr = server.addr;

    // Hold the only slot with a keep-alive connection
    let mut held = TcpStream::connect(addr).await.unwrap();
    held.write_all(HEALTH_KEEP_ALIVE.as_bytes()).await.unwrap();
    assert!(read_head(&mut held).await.starts_with("http/1.1 200"));

    let mut rejected = TcpStream::connect(addr).await.unwrap();
    assert_eq!(read_until_closed(&mut rejected).await, "");

    // The held connection is still served
    held.write_all(HEALTH_KEEP_ALIVE.as_bytes()).await.unwrap();
    assert!(read_head(&mut held).await.contains("http/1.1 200"));

    // Once it closes the slot frees up again, so the rejection did not leak it
    drop(held);
    let mut served = false;
    for _ in 0..50 {
        if roundtrip(addr, HEALTH_CLOSE).await.starts_with("http/1.1 200") {
            served = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(served, "slot was not released");

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_idle_connection_times_out() {
    let server = TestServer::start(|config| {
        config.performance.read_timeout = 1;
        config.performance.write_timeout = 1;
    });

    let started = Instant::now();
    let mut idle = TcpStream::connect(server.addr).await.unwrap();
    assert_eq!(read_until_closed(&mut idle).await, "");

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(900), "closed after {elapsed:?}");

    server.stop().await;
}
