//! HTTP client helpers for tests.

use std::time::Duration;

use ragate::RAGATE_STATUS_HEADER;
use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status, status header and JSON body of one response.
#[derive(Debug)]
pub struct AskOutcome {
    pub status: u16,
    pub status_header: Option<String>,
    pub body: Value,
}

impl AskOutcome {
    pub fn resposta(&self) -> Option<&str> {
        self.body.get("resposta").and_then(Value::as_str)
    }

    pub fn origem(&self) -> Option<&str> {
        self.body.get("origem").and_then(Value::as_str)
    }

    pub fn error_code(&self) -> Option<u64> {
        self.body.get("code").and_then(Value::as_u64)
    }
}

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn outcome(resp: reqwest::Response) -> reqwest::Result<AskOutcome> {
        let status = resp.status().as_u16();
        let status_header = resp
            .headers()
            .get(RAGATE_STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(AskOutcome {
            status,
            status_header,
            body,
        })
    }

    pub async fn ask(&self, question: &str) -> reqwest::Result<AskOutcome> {
        self.ask_json(json!({ "input_text": question })).await
    }

    pub async fn ask_json(&self, body: Value) -> reqwest::Result<AskOutcome> {
        let resp = self.client.post(self.url("/ask")).json(&body).send().await?;
        Self::outcome(resp).await
    }

    pub async fn ask_raw(&self, body: &'static str) -> reqwest::Result<AskOutcome> {
        let resp = self
            .client
            .post(self.url("/ask"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        Self::outcome(resp).await
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<AskOutcome> {
        let resp = self.client.get(self.url(path)).send().await?;
        Self::outcome(resp).await
    }

    pub async fn home(&self) -> reqwest::Result<(u16, String)> {
        let resp = self.client.get(self.url("/")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.text().await?))
    }
}
