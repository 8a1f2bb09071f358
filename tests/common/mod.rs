//! Shared harness: an in-process API server over a private in-memory database.

#![allow(dead_code)]

use dog_registry::{transport, Dog, RecordService, SqlStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub records: Arc<RecordService>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Starts the router on an ephemeral port with the three seed dogs (ids 1-3).
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with_seed(&Dog::seed()).await
    }

    pub async fn start_with_seed(seed: &[Dog]) -> Result<Self, Box<dyn std::error::Error>> {
        let store = SqlStore::in_memory().await?;
        let records = RecordService::new(store);
        records.init::<Dog>(seed).await?;

        let app_state = transport::http::AppState::new(records);
        let records = app_state.records.clone();
        let router = transport::http::create_router(app_state);

        // Bind to an ephemeral port to avoid conflicts between tests.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            records,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `body` verbatim so malformed payloads reach the server untouched.
    pub async fn send_raw(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &str,
    ) -> Result<(u16, JsonValue), Box<dyn std::error::Error>> {
        let resp = self
            .client
            .request(method, self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?;
        read(resp).await
    }

    pub async fn get(&self, path: &str) -> Result<(u16, JsonValue), Box<dyn std::error::Error>> {
        let resp = self.client.get(self.url(path)).send().await?;
        read(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(u16, JsonValue), Box<dyn std::error::Error>> {
        let resp = self.client.delete(self.url(path)).send().await?;
        read(resp).await
    }

    pub async fn create(&self, dog: JsonValue) -> Result<i64, Box<dyn std::error::Error>> {
        let (status, body) = self
            .send_raw(reqwest::Method::POST, "/api/dogs", &dog.to_string())
            .await?;
        assert_eq!(status, 201, "create failed: {}", body);
        Ok(body["data"]["id"].as_i64().ok_or("created dog has no id")?)
    }

    pub async fn count(&self) -> Result<usize, Box<dyn std::error::Error>> {
        let (status, body) = self.get("/api/dogs").await?;
        assert_eq!(status, 200);
        Ok(body["data"].as_array().ok_or("list is not an array")?.len())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read(resp: reqwest::Response) -> Result<(u16, JsonValue), Box<dyn std::error::Error>> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    if text.is_empty() {
        return Ok((status, JsonValue::Null));
    }
    Ok((status, serde_json::from_str(&text)?))
}
