//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use edge_gate::config::GateConfig;
use edge_gate::http::HttpServer;
use edge_gate::lifecycle::Shutdown;

/// Start a mock frontend that answers every request with its own request head.
///
/// The body lets tests see the forwarded request line and headers.
#[allow(dead_code)]
pub async fn start_echo_frontend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let mut read = 0;
                        loop {
                            match socket.read(&mut buf[read..]).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    read += n;
                                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                                        break;
                                    }
                                }
                            }
                        }
                        let head = String::from_utf8_lossy(&buf[..read]).to_string();
                        let head = head.split("\r\n\r\n").next().unwrap_or_default().to_string();
                        let response_str = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            head.len(),
                            head
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running gate bound to an ephemeral port.
#[allow(dead_code)]
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<GateConfig>,
}

/// Start the gate with `config`, returning once it accepts connections.
#[allow(dead_code)]
pub async fn start_gate(config: GateConfig) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, rx) = mpsc::unbounded_channel();
    let server_shutdown: broadcast::Receiver<()> = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestGate {
        addr,
        shutdown,
        config_updates,
    }
}

/// HTTP client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
