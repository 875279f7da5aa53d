use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use horoscope_core::HoroscopeError;
use serde_json::Value;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: Value,
}

/// Transport used by remote horoscope adapters.
#[async_trait]
pub trait ProviderBackend: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, HoroscopeError>;
}

/// Production backend using reqwest.
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderBackend for HttpBackend {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, HoroscopeError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        builder = builder.json(&request.body);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                HoroscopeError::Unavailable(format!("HTTP request failed: {e}"))
            } else {
                HoroscopeError::Provider(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| HoroscopeError::Provider(format!("failed to read response body: {e}")))?;
        let body = decode_body(status, &raw)?;

        Ok(ProviderResponse { status, body })
    }
}

/// Decode a response body as JSON.
///
/// Error statuses keep non-JSON bodies as a string (or null when empty) so the
/// caller can still map the status; only a successful response must be JSON.
fn decode_body(status: u16, raw: &str) -> Result<Value, HoroscopeError> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(raw) {
        Ok(body) => Ok(body),
        Err(_) if status >= 400 => Ok(Value::String(raw.to_string())),
        Err(e) => Err(HoroscopeError::Parsing(format!(
            "failed to parse response JSON: {e}"
        ))),
    }
}

/// Test backend with queued responses that records every request it receives.
pub struct FakeBackend {
    responses: Arc<Mutex<VecDeque<Result<ProviderResponse, HoroscopeError>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_response(&self, response: ProviderResponse) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: HoroscopeError) -> &Self {
        self.responses
            .try_lock()
            .expect("not concurrent during setup")
            .push_back(Err(error));
        self
    }

    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderBackend for FakeBackend {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, HoroscopeError> {
        self.requests.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .unwrap_or_else(|| Err(HoroscopeError::Provider("FakeBackend exhausted".to_string())))
    }
}
