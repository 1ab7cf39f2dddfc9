//! Shared test infrastructure for integration tests
//!
//! Provides `TestServer` (the real router on an ephemeral port with temporary
//! data and public directories) and `FakeRelay` (a stand-in for the Telegram
//! Bot API that records every message it receives).

#![allow(dead_code)]

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use site_server::{
    build_router,
    config::Config,
    services::credentials::CredentialStore,
    state::AppState,
    storage::FileStore,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const SESSION_SECRET: &str = "integration-test-secret";
pub const BOOTSTRAP_PASSWORD: &str = "bootstrap-pass";

/// Router served on 127.0.0.1 for the lifetime of the value.
pub struct TestServer {
    addr: SocketAddr,
    dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Admin configured with the bootstrap password, no relay.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with the default test config adjusted by `configure`.
    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config {
            data_dir: dir.path().join("data"),
            public_dir: dir.path().join("public"),
            admin_session_secret: Some(SESSION_SECRET.to_string()),
            admin_password: Some(BOOTSTRAP_PASSWORD.to_string()),
            // Plain http in tests; the cookie store drops Secure cookies otherwise.
            cookie_secure: false,
            site_name: "Test Site".to_string(),
            site_domain: "test.local".to_string(),
            site_url: "https://test.local".to_string(),
            ..Config::default()
        };
        configure(&mut config);

        let docs = Arc::new(FileStore::new(config.data_dir.clone()));
        let credentials = CredentialStore::new(
            docs.clone(),
            config.bootstrap_password().map(str::to_string),
        )
        .with_bcrypt_cost(4);
        let state = AppState::new(config, docs)
            .expect("Failed to build state")
            .with_credentials(credentials);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build client");

        Self { addr, dir, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.dir.path().join("public").join("uploads")
    }

    /// A client with its own, empty cookie jar.
    pub fn anonymous_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build client")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        into_json(resp).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        into_json(resp).await
    }

    /// Log in with the bootstrap password; the session cookie lands in `client`.
    pub async fn login(&self) {
        let (status, body) = self
            .post_json("/api/admin/login", json!({ "password": BOOTSTRAP_PASSWORD }))
            .await;
        assert_eq!(status, 200, "login failed: {body}");
    }
}

pub async fn into_json(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Stand-in relay answering `POST /bot<token>/sendMessage`.
pub struct FakeRelay {
    addr: SocketAddr,
    messages: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct RelayState {
    messages: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

impl FakeRelay {
    /// Relay that answers every message with `status`.
    pub async fn start(status: StatusCode) -> Self {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let state = RelayState {
            messages: messages.clone(),
            status,
        };

        let app = Router::new()
            .route("/{bot}/sendMessage", post(record_message))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind relay");
        let addr = listener.local_addr().expect("No local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, messages }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn messages(&self) -> Vec<Value> {
        self.messages.lock().unwrap().clone()
    }

    /// Wait for background notifications to arrive.
    pub async fn wait_for(&self, count: usize) -> Vec<Value> {
        for _ in 0..50 {
            let messages = self.messages();
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.messages()
    }
}

async fn record_message(
    State(state): State<RelayState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.messages.lock().unwrap().push(body);
    if state.status.is_success() {
        (state.status, Json(json!({ "ok": true })))
    } else {
        (
            state.status,
            Json(json!({ "ok": false, "description": "Bad Request: chat not found" })),
        )
    }
}
