//! Shared mock daemon for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use upstream_rpc::{RpcClient, UpstreamConfig};

type Responder = dyn Fn(&Value) -> (u16, String) + Send + Sync;

/// A request as seen by the mock daemon.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CapturedRequest {
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: Value,
}

struct DaemonState {
    responder: Box<Responder>,
    delay: Option<Duration>,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// A programmable JSON-RPC daemon listening on an ephemeral port.
pub struct MockDaemon {
    pub addr: SocketAddr,
    state: Arc<DaemonState>,
}

#[allow(dead_code)]
impl MockDaemon {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
    {
        Self::start_with_delay(responder, None).await
    }

    pub async fn start_with_delay<F>(responder: F, delay: Option<Duration>) -> Self
    where
        F: Fn(&Value) -> (u16, String) + Send + Sync + 'static,
    {
        let state = Arc::new(DaemonState {
            responder: Box::new(responder),
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/json_rpc", post(handle))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Upstream descriptor pointing at this daemon.
    pub fn upstream(&self, name: &str) -> UpstreamConfig {
        let mut config = UpstreamConfig::new(name, "127.0.0.1", self.addr.port());
        config.timeout = "2s".into();
        config
    }

    /// Client for this daemon that bypasses any system proxy.
    pub fn client(&self, config: &UpstreamConfig) -> RpcClient {
        connect(config)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Build a client for `config`, honouring its timeout, without proxy lookup.
pub fn connect(config: &UpstreamConfig) -> RpcClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(config.request_timeout().unwrap())
        .build()
        .unwrap();
    RpcClient::with_http_client(config, http).unwrap()
}

/// A port with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// JSON-RPC success body.
#[allow(dead_code)]
pub fn ok_body(result: Value) -> (u16, String) {
    (200, serde_json::json!({"id": 0, "jsonrpc": "2.0", "result": result}).to_string())
}

/// JSON-RPC error body.
#[allow(dead_code)]
pub fn error_body(message: &str) -> (u16, String) {
    (
        200,
        serde_json::json!({"id": 0, "jsonrpc": "2.0", "error": {"code": -2, "message": message}})
            .to_string(),
    )
}

async fn handle(
    State(state): State<Arc<DaemonState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    state.requests.lock().unwrap().push(CapturedRequest {
        content_type: header_value(header::CONTENT_TYPE),
        accept: header_value(header::ACCEPT),
        body: request.clone(),
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let (status, body) = (state.responder)(&request);
    (StatusCode::from_u16(status).unwrap(), body)
}
