//! Shared utilities for integration tests.

#![allow(dead_code)]

use alloy::primitives::B256;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use thor_tx::config::NodeConfig;
use thor_tx::Transaction;

pub const CHAIN_TAG: u8 = 0x27;

/// One parsed HTTP request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl MockRequest {
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Start a programmable mock backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
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

async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(MockRequest { method, path, body })
}

pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
}

pub fn block_id(number: u32, last_byte: u8) -> B256 {
    let mut id = [0x5au8; 32];
    id[..4].copy_from_slice(&number.to_be_bytes());
    id[31] = last_byte;
    B256::from(id)
}

pub fn block_json(number: u32, id: B256, timestamp: u64) -> String {
    json!({
        "number": number,
        "id": id,
        "size": 373,
        "parentID": B256::ZERO,
        "timestamp": timestamp,
        "gasLimit": 10_000_000u64,
        "beneficiary": "0x0000000000000000000000000000000000000000",
        "gasUsed": 0,
        "totalScore": 0,
        "isTrunk": true,
        "isFinalized": false,
        "transactions": []
    })
    .to_string()
}

pub fn receipt_json(id: B256, reverted: bool) -> String {
    json!({
        "gasUsed": 21000,
        "gasPayer": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed",
        "paid": "0x1236efcbcbb340000",
        "reward": "0x576e189f04f60000",
        "reverted": reverted,
        "meta": {
            "blockID": block_id(101, 0x01),
            "blockNumber": 101,
            "blockTimestamp": unix_now(),
            "txID": id,
            "txOrigin": "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed"
        },
        "outputs": []
    })
    .to_string()
}

/// Observable state of a [`start_mock_node`] node.
#[derive(Debug, Default)]
pub struct NodeState {
    /// Raw transactions received on `POST /transactions`.
    pub sent: Vec<String>,
    /// Bodies received on `POST /accounts/*`.
    pub inspected: Vec<String>,
    /// Receipt lookups so far.
    pub receipt_requests: u32,
    /// Receipt is served from this lookup on; `None` never.
    pub receipt_from: Option<u32>,
    /// Gas reported per clause by the dry run.
    pub gas_per_clause: u64,
    /// Status and body answered to every submission instead of accepting it.
    pub reject_submit: Option<(u16, String)>,
}

/// Start a mock Thor node serving the REST endpoints the client uses.
pub async fn start_mock_node(state: Arc<Mutex<NodeState>>) -> SocketAddr {
    start_programmable_backend(move |request| {
        let state = state.clone();
        async move { handle_node_request(&state, &request) }
    })
    .await
}

fn handle_node_request(state: &Mutex<NodeState>, request: &MockRequest) -> (u16, String) {
    let mut state = state.lock().unwrap();
    let path = request.path.as_str();

    match (request.method.as_str(), path) {
        ("GET", "/blocks/0") => (200, block_json(0, block_id(0, CHAIN_TAG), 1_530_316_800)),
        ("GET", "/blocks/best") | ("GET", "/blocks/finalized") => {
            (200, block_json(100, block_id(100, 0x01), unix_now()))
        }
        ("GET", p) if p.starts_with("/blocks/") => (200, "null".to_string()),
        ("POST", "/accounts/*") => {
            state.inspected.push(request.body.clone());
            let body: serde_json::Value = request.json();
            let clauses = body["clauses"].as_array().map(|c| c.len()).unwrap_or(0);
            let results: Vec<_> = (0..clauses)
                .map(|_| {
                    json!({
                        "data": "0x",
                        "events": [],
                        "transfers": [],
                        "gasUsed": state.gas_per_clause,
                        "reverted": false,
                        "vmError": ""
                    })
                })
                .collect();
            (200, serde_json::Value::Array(results).to_string())
        }
        ("POST", "/transactions") => {
            if let Some((status, body)) = state.reject_submit.clone() {
                return (status, body);
            }
            let body: serde_json::Value = request.json();
            let raw = body["raw"].as_str().unwrap_or_default().to_string();
            match Transaction::from_hex(&raw).and_then(|tx| tx.id()) {
                Ok(id) => {
                    state.sent.push(raw);
                    (200, json!({ "id": id }).to_string())
                }
                Err(e) => (400, format!("bad tx: {}", e)),
            }
        }
        ("GET", p) if p.starts_with("/transactions/") && p.ends_with("/receipt") => {
            state.receipt_requests += 1;
            let id: B256 = p
                .trim_start_matches("/transactions/")
                .trim_end_matches("/receipt")
                .parse()
                .unwrap();
            match state.receipt_from {
                Some(from) if state.receipt_requests >= from => (200, receipt_json(id, false)),
                _ => (200, "null".to_string()),
            }
        }
        _ => (404, "not found".to_string()),
    }
}

pub fn node_config(addr: SocketAddr) -> NodeConfig {
    NodeConfig {
        url: format!("http://{}", addr),
        failover_urls: Vec::new(),
        timeout_secs: 5,
    }
}
