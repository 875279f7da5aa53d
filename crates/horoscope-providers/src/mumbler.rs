use std::sync::Arc;

use async_trait::async_trait;
use horoscope_core::{HoroscopeError, HoroscopeProvider};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::{ProviderBackend, ProviderRequest, ProviderResponse};

pub const DEFAULT_MUMBLER_URL: &str = "http://localhost:8787";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MumblerConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Zodiac sign hint forwarded with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
}

impl MumblerConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_MUMBLER_URL.to_string(),
            api_key: None,
            sign: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_sign(mut self, sign: impl Into<String>) -> Self {
        self.sign = Some(sign.into());
        self
    }

    pub fn validate(&self) -> Result<(), HoroscopeError> {
        if self.base_url.trim().is_empty() {
            return Err(HoroscopeError::Config(
                "Mumbler base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MumblerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter for the Mumbler horoscope service.
pub struct MumblerAdapter {
    config: MumblerConfig,
    backend: Arc<dyn ProviderBackend>,
}

impl MumblerAdapter {
    pub fn new(config: MumblerConfig, backend: Arc<dyn ProviderBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &MumblerConfig {
        &self.config
    }

    fn build_request(&self, subject: &str, effective_date: &str) -> ProviderRequest {
        let mut body = json!({
            "subject": subject,
            "date": effective_date,
        });
        if let Some(ref sign) = self.config.sign {
            body["sign"] = json!(sign);
        }

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(ref key) = self.config.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }

        ProviderRequest {
            url: format!(
                "{}/v1/horoscope",
                self.config.base_url.trim_end_matches('/')
            ),
            headers,
            body,
        }
    }
}

fn check_error_status(resp: &ProviderResponse) -> Result<(), HoroscopeError> {
    if resp.status < 400 {
        return Ok(());
    }
    let msg = match (&resp.body["error"]["message"], &resp.body) {
        (Value::String(message), _) => message.clone(),
        (_, Value::String(raw)) => raw.clone(),
        (_, Value::Null) => "empty response body".to_string(),
        (_, body) => body.to_string(),
    };
    Err(match resp.status {
        429 => HoroscopeError::RateLimit(msg),
        503 | 504 => HoroscopeError::Unavailable(msg),
        status => HoroscopeError::Provider(format!("Mumbler API error ({status}): {msg}")),
    })
}

fn parse_response(resp: &ProviderResponse) -> Result<String, HoroscopeError> {
    check_error_status(resp)?;
    horoscope_text(&resp.body)
}

fn horoscope_text(body: &Value) -> Result<String, HoroscopeError> {
    body["horoscope"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| HoroscopeError::Parsing("missing 'horoscope' in Mumbler response".into()))
}

#[async_trait]
impl HoroscopeProvider for MumblerAdapter {
    async fn horoscope_for(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError> {
        let request = self.build_request(subject, effective_date);
        tracing::debug!(url = %request.url, subject = %subject, date = %effective_date, "mumbler request");
        let response = self.backend.send(request).await?;
        parse_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_structured_field() {
        let resp = ProviderResponse {
            status: 400,
            body: json!({"error": {"message": "unknown horse"}}),
        };
        let err = check_error_status(&resp).unwrap_err();
        assert_eq!(
            err,
            HoroscopeError::Provider("Mumbler API error (400): unknown horse".into())
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        let resp = ProviderResponse {
            status: 500,
            body: json!("boom"),
        };
        let err = check_error_status(&resp).unwrap_err();
        assert_eq!(
            err,
            HoroscopeError::Provider("Mumbler API error (500): boom".into())
        );
    }

    #[test]
    fn error_message_for_json_without_error_field() {
        let resp = ProviderResponse {
            status: 502,
            body: json!({"detail": "upstream"}),
        };
        let err = check_error_status(&resp).unwrap_err();
        assert_eq!(
            err,
            HoroscopeError::Provider(r#"Mumbler API error (502): {"detail":"upstream"}"#.into())
        );
    }

    #[test]
    fn empty_error_body_keeps_status_mapping() {
        let resp = ProviderResponse {
            status: 429,
            body: Value::Null,
        };
        let err = check_error_status(&resp).unwrap_err();
        assert_eq!(err, HoroscopeError::RateLimit("empty response body".into()));
    }

    #[test]
    fn trailing_slash_in_base_url() {
        let adapter = MumblerAdapter::new(
            MumblerConfig::new().with_base_url("http://mumbler.test/"),
            Arc::new(crate::FakeBackend::new()),
        );
        let request = adapter.build_request("Seabiscuit", "2024-05-05");
        assert_eq!(request.url, "http://mumbler.test/v1/horoscope");
    }
}
