//! Text improvement client
//!
//! Sends selected text and a prompt to a text-improvement service and
//! returns the revised text. Two implementations share the `TextImprover`
//! capability:
//!
//! - `HttpTextImprover` posts to `{base_url}/api/improve-text`
//! - `MockTextImprover` answers locally after a simulated delay
//!
//! `TextImprovementClient` picks one of them from `ClientConfig`.

use crate::config::{ClientBackend, ClientConfig, IMPROVE_TEXT_PATH};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Failures of a single improvement request
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned status {0}")]
    BadResponse(u16),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextImprovementRequest {
    pub selected_text: String,
    pub prompt: String,
}

impl TextImprovementRequest {
    pub fn new(selected_text: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            selected_text: selected_text.into(),
            prompt: prompt.into(),
        }
    }
}

/// Response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextImprovementResponse {
    pub original_text: String,
    pub improved_text: String,
}

/// Capability to revise text according to a prompt
pub trait TextImprover: Send + Sync {
    fn improve(
        &self,
        request: &TextImprovementRequest,
    ) -> impl Future<Output = Result<TextImprovementResponse, ApiError>> + Send;
}

/// Client for the real service
#[derive(Clone)]
pub struct HttpTextImprover {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTextImprover {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("MoonMate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the improvement endpoint
    pub fn endpoint(&self) -> Result<reqwest::Url, ApiError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), IMPROVE_TEXT_PATH);
        reqwest::Url::parse(&raw).map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", raw, e)))
    }
}

impl TextImprover for HttpTextImprover {
    async fn improve(
        &self,
        request: &TextImprovementRequest,
    ) -> Result<TextImprovementResponse, ApiError> {
        let url = self.endpoint()?;

        tracing::debug!("Requesting text improvement from {}", url);

        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Text improvement service returned status: {}", status);
            return Err(ApiError::BadResponse(status.as_u16()));
        }

        let body = response.bytes().await?;
        let result: TextImprovementResponse = serde_json::from_slice(&body)?;

        tracing::debug!(
            "Received improvement ({} -> {} bytes)",
            result.original_text.len(),
            result.improved_text.len()
        );

        Ok(result)
    }
}

/// Phrase substitutions applied by the offline client when asked to make
/// text "better"
const MOCK_REPLACEMENTS: &[(&str, &str)] = &[
    ("For emphasis", "With dramatic flair"),
    ("stabbed", "thrust"),
    ("Pyrennees", "Pyrenees"),
    (
        "to declare them part of the present",
        "as if claiming them for the present moment",
    ),
    (
        "with the snow-glitter along the peaks a little tinsel to add glamour to the gift",
        "their snow-capped peaks sparkling like tinsel on an extravagant gift",
    ),
];

/// Deterministic offline client used for development and UI testing
#[derive(Debug, Clone)]
pub struct MockTextImprover {
    delay: Duration,
}

impl MockTextImprover {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn rewrite(text: &str, prompt: &str) -> String {
        if !prompt.to_lowercase().contains("better") {
            return text.to_string();
        }

        MOCK_REPLACEMENTS
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

impl TextImprover for MockTextImprover {
    async fn improve(
        &self,
        request: &TextImprovementRequest,
    ) -> Result<TextImprovementResponse, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let improved = Self::rewrite(&request.selected_text, &request.prompt);

        Ok(TextImprovementResponse {
            original_text: request.selected_text.clone(),
            improved_text: format!(
                "Suggested Edit\n- {}\n+ {}",
                request.selected_text, improved
            ),
        })
    }
}

/// Text improver selected by configuration
#[derive(Clone)]
pub enum TextImprovementClient {
    Http(HttpTextImprover),
    Mock(MockTextImprover),
}

impl TextImprovementClient {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        match config.backend {
            ClientBackend::Http => {
                let client = HttpTextImprover::new(config.base_url.clone(), config.timeout)?;
                // Fail early on a malformed base URL
                client.endpoint()?;
                tracing::info!("Using text improvement service at {}", config.base_url);
                Ok(TextImprovementClient::Http(client))
            }
            ClientBackend::Mock => {
                tracing::info!("Using offline text improvement client");
                Ok(TextImprovementClient::Mock(MockTextImprover::new(
                    config.mock_delay,
                )))
            }
        }
    }
}

impl TextImprover for TextImprovementClient {
    async fn improve(
        &self,
        request: &TextImprovementRequest,
    ) -> Result<TextImprovementResponse, ApiError> {
        match self {
            TextImprovementClient::Http(client) => client.improve(request).await,
            TextImprovementClient::Mock(client) => client.improve(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_client(base_url: &str) -> HttpTextImprover {
        HttpTextImprover::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_json_shape() {
        let request = TextImprovementRequest::new("old text", "make it better");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"selectedText": "old text", "prompt": "make it better"})
        );
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = http_client("http://localhost:8080/");
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "http://localhost:8080/api/improve-text"
        );
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let client = http_client("not a url");
        let result = client
            .improve(&TextImprovementRequest::new("a", "b"))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_http_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/improve-text"))
            .and(body_json(serde_json::json!({
                "selectedText": "teh cat",
                "prompt": "fix typos"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "originalText": "teh cat",
                "improvedText": "the cat"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = http_client(&server.uri());
        let response = client
            .improve(&TextImprovementRequest::new("teh cat", "fix typos"))
            .await
            .unwrap();

        assert_eq!(response.original_text, "teh cat");
        assert_eq!(response.improved_text, "the cat");
    }

    #[tokio::test]
    async fn test_http_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/improve-text"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = http_client(&server.uri());
        let result = client.improve(&TextImprovementRequest::new("a", "b")).await;

        assert!(matches!(result, Err(ApiError::BadResponse(503))));
    }

    #[tokio::test]
    async fn test_http_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/improve-text"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
            .mount(&server)
            .await;

        let client = http_client(&server.uri());
        let result = client.improve(&TextImprovementRequest::new("a", "b")).await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_http_unreachable_host() {
        // Port 9 (discard) on localhost is not expected to accept connections
        let client = http_client("http://127.0.0.1:9");
        let result = client.improve(&TextImprovementRequest::new("a", "b")).await;

        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn test_mock_formats_diff() {
        let client = MockTextImprover::new(Duration::ZERO);
        let response = client
            .improve(&TextImprovementRequest::new(
                "For emphasis he stabbed a finger",
                "Make it better",
            ))
            .await
            .unwrap();

        assert_eq!(response.original_text, "For emphasis he stabbed a finger");
        assert_eq!(
            response.improved_text,
            "Suggested Edit\n- For emphasis he stabbed a finger\n\
             + With dramatic flair he thrust a finger"
        );
    }

    #[tokio::test]
    async fn test_mock_echoes_without_better_prompt() {
        let client = MockTextImprover::new(Duration::ZERO);
        let response = client
            .improve(&TextImprovementRequest::new("stabbed", "shorten"))
            .await
            .unwrap();

        assert_eq!(response.improved_text, "Suggested Edit\n- stabbed\n+ stabbed");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_waits_for_delay() {
        let client = MockTextImprover::new(Duration::from_secs(1));
        let start = tokio::time::Instant::now();

        client
            .improve(&TextImprovementRequest::new("a", "b"))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[test]
    fn test_client_from_config() {
        let mock = TextImprovementClient::from_config(&ClientConfig::default()).unwrap();
        assert!(matches!(mock, TextImprovementClient::Mock(_)));

        let http = TextImprovementClient::from_config(&ClientConfig {
            backend: ClientBackend::Http,
            ..ClientConfig::default()
        })
        .unwrap();
        assert!(matches!(http, TextImprovementClient::Http(_)));

        let bad = TextImprovementClient::from_config(&ClientConfig {
            backend: ClientBackend::Http,
            base_url: "::nope::".to_string(),
            ..ClientConfig::default()
        });
        assert!(matches!(bad, Err(ApiError::InvalidEndpoint(_))));
    }
}
