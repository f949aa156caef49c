//! Harness for black-box HTTP tests: spawns the real router on an
//! ephemeral port with an in-memory store and talks to it with reqwest.

use std::sync::Arc;

use valentine_common::api;
use valentine_server::routes::{self, AppState};
use valentine_server::service::ProposalService;
use valentine_server::store::MemoryStore;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// Spawn a fresh server. Each call gets its own empty store, so tests
/// are independent.
pub async fn spawn_server() -> TestServer {
    let state = Arc::new(AppState {
        service: ProposalService::new(Arc::new(MemoryStore::default())),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        routes::run(listener, state).await.expect("server failed");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
    }
}

impl TestServer {
    pub async fn create(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, api::CREATE_PATH))
            .json(body)
            .send()
            .await
            .expect("create request failed")
    }

    pub async fn get(&self, id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, api::get_path(id)))
            .send()
            .await
            .expect("get request failed")
    }

    pub async fn accept(&self, id: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, api::accept_path(id)))
            .send()
            .await
            .expect("accept request failed")
    }
}
