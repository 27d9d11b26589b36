//! Shared helpers for the in-process integration tests.
//!
//! The server is served on an ephemeral port inside the test runtime; WebSocket
//! clients are driven with tokio-tungstenite and the REST API with reqwest.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use linkclub_server::ui::{AppState, Server};
use linkclub_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Time to wait for a frame that is expected to arrive
const RECV_TIMEOUT: Duration = Duration::from_secs(2);
/// Time to watch a connection that is expected to stay quiet
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Helper struct to manage the in-process server lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let server = Server::new(AppState::in_memory(Arc::new(SystemClock)));
        let app = server.router(&["http://localhost:5173".to_string()]);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });
        Self { addr, handle }
    }

    pub fn ws_url(&self, user_id: &str) -> String {
        format!("ws://{}/ws?userId={}", self.addr, user_id)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct for one WebSocket client
pub struct TestClient {
    socket: Socket,
}

impl TestClient {
    pub async fn connect(server: &TestServer, user_id: &str) -> Self {
        Self::connect_url(server.ws_url(user_id)).await
    }

    pub async fn connect_anonymous(server: &TestServer) -> Self {
        Self::connect_url(format!("ws://{}/ws", server.addr)).await
    }

    async fn connect_url(url: String) -> Self {
        let (socket, _) = connect_async(url).await.expect("Failed to connect");
        Self { socket }
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        self.send_raw(json!({ "event": event, "data": data }).to_string())
            .await;
    }

    pub async fn send_raw(&mut self, text: String) {
        self.socket
            .send(Message::text(text))
            .await
            .expect("Failed to send frame");
    }

    /// Next JSON frame, or `None` if nothing arrives within `wait`.
    async fn next_frame(&mut self, wait: Duration) -> Option<Value> {
        loop {
            let msg = tokio::time::timeout(wait, self.socket.next()).await.ok()??;
            match msg.expect("WebSocket error") {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON frame"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    /// Wait for `name`, skipping presence announcements on the way.
    pub async fn expect_event(&mut self, name: &str) -> Value {
        loop {
            let frame = self
                .next_frame(RECV_TIMEOUT)
                .await
                .unwrap_or_else(|| panic!("Timed out waiting for '{}'", name));
            if frame["event"] == "getOnlineUsers" {
                continue;
            }
            assert_eq!(frame["event"], name, "unexpected frame: {}", frame);
            return frame["data"].clone();
        }
    }

    /// Wait until a presence announcement lists exactly `expected`.
    pub async fn wait_online(&mut self, expected: &[&str]) {
        let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        expected.sort();
        loop {
            let frame = self
                .next_frame(RECV_TIMEOUT)
                .await
                .unwrap_or_else(|| panic!("Timed out waiting for online users {:?}", expected));
            if frame["event"] != "getOnlineUsers" {
                continue;
            }
            let mut online: Vec<String> = serde_json::from_value(frame["data"].clone())
                .expect("getOnlineUsers payload is not a list of ids");
            online.sort();
            if online == expected {
                return;
            }
        }
    }

    /// Assert that nothing but presence announcements arrives for a short while.
    pub async fn expect_silence(&mut self) {
        while let Some(frame) = self.next_frame(SILENCE_WINDOW).await {
            assert_eq!(frame["event"], "getOnlineUsers", "unexpected frame: {}", frame);
        }
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

/// REST client acting as `user_id`
pub struct ApiClient {
    http: reqwest::Client,
    user_id: String,
}

impl ApiClient {
    pub fn new(user_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            user_id: user_id.to_string(),
        }
    }

    pub async fn post(&self, server: &TestServer, path: &str, body: Value) -> reqwest::Response {
        self.http
            .post(server.url(path))
            .header("X-User-Id", &self.user_id)
            .json(&body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn patch(&self, server: &TestServer, path: &str) -> reqwest::Response {
        self.http
            .patch(server.url(path))
            .header("X-User-Id", &self.user_id)
            .send()
            .await
            .expect("PATCH failed")
    }

    pub async fn get(&self, server: &TestServer, path: &str) -> reqwest::Response {
        self.http
            .get(server.url(path))
            .header("X-User-Id", &self.user_id)
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn befriend(&self, server: &TestServer, friend_id: &str) {
        let response = self
            .post(server, &format!("/api/friends/{}", friend_id), json!({}))
            .await;
        assert!(response.status().is_success());
    }
}
