//! Leaderboard service binary: a thin tokio socket shell around the pure
//! request handler.
mod http;
mod schema;
mod storage;

use std::sync::Arc;

use log::{error, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use http::{Request, Response, handle_request};
use storage::{MemoryStore, ScoreStore};

const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const ADDR_ENV_VAR: &str = "NIGHTSHIFT_ADDR";
const MAX_REQUEST_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() {
    env_logger::init();

    let addr = std::env::var(ADDR_ENV_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind leaderboard service on {addr}: {err}");
            return;
        }
    };
    info!("Leaderboard service listening on http://{addr}");

    let store: Arc<dyn ScoreStore> = Arc::new(MemoryStore::new());
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                error!("Accept error: {err}");
                continue;
            }
        };
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(err) = serve_connection(stream, store.as_ref()).await {
                error!("Connection from {peer} failed: {err}");
            }
        });
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    store: &dyn ScoreStore,
) -> std::io::Result<()> {
    let raw = match read_request(&mut stream).await? {
        Some(raw) => raw,
        None => return Ok(()),
    };
    let response = match Request::parse(&raw) {
        Some(request) => {
            info!("{} {}", request.method, request.path);
            handle_request(&request, store)
        }
        None => Response {
            status: 400,
            body: String::from("{\"message\":\"malformed request\"}"),
        },
    };
    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Read one request: headers up to the blank line, then exactly the body
/// the Content-Length header promises.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_REQUEST_BYTES {
            return Ok(None);
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let expected = header_end + 4 + Request::content_length(&head);
    while buf.len() < expected.min(MAX_REQUEST_BYTES) {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}
