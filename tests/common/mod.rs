//! Mock feed and bot endpoint for integration tests.
//!
//! - `MockFeedServer`: WebSocket server that sends a fixed script of frames
//!   to each connection, then either closes or holds the connection open.
//! - `MockBot`: HTTP server with a `POST /trigger_query` route that records
//!   request bodies and answers with a fixed status.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use alsat_feed::{Dashboard, Session};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AfterScript {
    Close,
    Hold,
}

pub struct MockFeedServer {
    addr: SocketAddr,
    connections: Arc<Mutex<u32>>,
    disconnects: Arc<Mutex<u32>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockFeedServer {
    pub async fn start(script: Vec<Message>, after: AfterScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(Mutex::new(0u32));
        let disconnects = Arc::new(Mutex::new(0u32));

        let connections_clone = connections.clone();
        let disconnects_clone = disconnects.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                *connections_clone.lock().await += 1;
                let disconnects = disconnects_clone.clone();
                let script = script.clone();
                tokio::spawn(async move {
                    handle_connection(stream, script, after).await;
                    *disconnects.lock().await += 1;
                });
            }
        });

        Self { addr, connections, disconnects, task }
    }

    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub async fn connection_count(&self) -> u32 {
        *self.connections.lock().await
    }

    /// Connections whose client has gone away.
    pub async fn disconnect_count(&self) -> u32 {
        *self.disconnects.lock().await
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn handle_connection(stream: TcpStream, script: Vec<Message>, after: AfterScript) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };
    let (mut write, mut read) = ws_stream.split();

    for msg in script {
        if write.send(msg).await.is_err() {
            return;
        }
    }

    if after == AfterScript::Close {
        let _ = write.send(Message::Close(None)).await;
    }

    // drain until the client goes away
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }
}

#[derive(Clone, Debug)]
pub struct BotRequest {
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct BotState {
    status: StatusCode,
    requests: Arc<Mutex<Vec<BotRequest>>>,
}

pub struct MockBot {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<BotRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockBot {
    pub async fn start(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = BotState { status, requests: requests.clone() };
        let app = Router::new().route("/trigger_query", post(trigger_query)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests, task }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(&self) -> Vec<BotRequest> {
        self.requests.lock().await.clone()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

async fn trigger_query(State(state): State<BotState>, headers: HeaderMap, body: String) -> StatusCode {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().await.push(BotRequest { content_type, body });
    state.status
}

/// A TCP port with nothing listening on it.
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Polls the session until `pred` holds or two seconds pass.
pub async fn wait_for(session: &Session, pred: impl Fn(&Dashboard) -> bool) -> Dashboard {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let snap = session.snapshot();
            if pred(&snap) {
                return snap;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    match result {
        Ok(snap) => snap,
        Err(_) => panic!("timed out; last state: {:?}", session.snapshot()),
    }
}

pub fn text(s: &str) -> Message {
    Message::Text(s.to_string())
}
