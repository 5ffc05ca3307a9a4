#![allow(dead_code)] // each test binary uses a subset of these helpers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use chamahub::config::Config;
use chamahub::server::{AppState, Server};

/// Spawn the service on an ephemeral port and hand back its address
/// together with the shared state, so tests can publish domain events
/// and inspect the registry and delivery log behind the running API.
///
/// The delivery timeout is shortened so timeout tests finish quickly.
pub async fn spawn_app() -> (String, AppState) {
    let config = {
        let mut config = Config::load().unwrap();
        config.server.host = "localhost".to_string();
        config.server.port = 0;
        config.webhook.timeout_secs = 2;
        config
    };

    let server = Server::new(&config).await.unwrap();
    let state = server.state();

    let port = server.port();
    tokio::spawn(server.run());

    (format!("http://{}:{}", config.server.host, port), state)
}

pub async fn spawn_server() -> String {
    let (addr, _) = spawn_app().await;
    addr
}

/// One request captured by the receiver
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Clone)]
struct ReceiverState {
    requests: Arc<RwLock<Vec<ReceivedRequest>>>,
}

/// Webhook endpoint double: records every request it receives and
/// answers according to the path hit.
pub struct CaptureReceiver {
    addr: String,
    requests: Arc<RwLock<Vec<ReceivedRequest>>>,
}

impl CaptureReceiver {
    /// Bind on an ephemeral loopback port and start serving
    pub async fn spawn() -> Self {
        let requests: Arc<RwLock<Vec<ReceivedRequest>>> = Arc::new(RwLock::new(Vec::new()));
        let app = Router::new().fallback(capture).with_state(ReceiverState {
            requests: requests.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    /// Absolute URL for a path on this receiver
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub async fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests.read().await.clone()
    }
}

/// Record the request, then answer by path: `/created` is 201, `/error`
/// is 500, `/slow` responds only after the delivery timeout has passed,
/// anything else is 200.
async fn capture(
    State(state): State<ReceiverState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let captured_headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let path = uri.path().to_string();
    state.requests.write().await.push(ReceivedRequest {
        method: method.to_string(),
        path: path.clone(),
        headers: captured_headers,
        body,
    });

    match path.as_str() {
        "/created" => (StatusCode::CREATED, "created").into_response(),
        "/error" => (StatusCode::INTERNAL_SERVER_ERROR, "server error").into_response(),
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, "late").into_response()
        }
        _ => (StatusCode::OK, "ok").into_response(),
    }
}
