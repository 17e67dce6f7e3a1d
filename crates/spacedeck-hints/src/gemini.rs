//! Google Gemini `generateContent` provider.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use spacedeck_core::traits::{HintProvider, HintRequest};

use crate::error::HintError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 256;

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            client,
        })
    }

    pub fn with_generation(mut self, temperature: f64, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> anyhow::Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        self.timeout_secs = timeout_secs;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[async_trait]
impl HintProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn hint(&self, request: &HintRequest) -> anyhow::Result<String> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HintError::Timeout(self.timeout_secs)
                } else {
                    HintError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(HintError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(HintError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(HintError::ModelNotFound(self.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(HintError::ApiError { status, message }.into());
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| HintError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(HintError::EmptyResponse)?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn word_request() -> HintRequest {
        HintRequest::WordExample {
            word: "house".into(),
            translation: "casa".into(),
        }
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("test-key", Some(server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn successful_hint() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "1. My house is big. - Minha casa é grande."}], "role": "model"}
            }]
        });

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-3-flash-preview:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"temperature": 0.7, "maxOutputTokens": 256}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let text = provider(&server).hint(&word_request()).await.unwrap();
        assert!(text.contains("My house is big"));
    }

    #[tokio::test]
    async fn rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let err = provider(&server).hint(&word_request()).await.unwrap_err();
        let hint_err = err.downcast_ref::<HintError>().unwrap();
        assert!(matches!(
            hint_err,
            HintError::RateLimited {
                retry_after_ms: 7000
            }
        ));
    }

    #[tokio::test]
    async fn forbidden_is_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = provider(&server).hint(&word_request()).await.unwrap_err();
        let hint_err = err.downcast_ref::<HintError>().unwrap();
        assert!(hint_err.is_permanent());
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn api_error_message_extracted() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"code": 400, "message": "Invalid argument", "status": "INVALID_ARGUMENT"}
        });

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let err = provider(&server).hint(&word_request()).await.unwrap_err();
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[tokio::test]
    async fn empty_candidates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server).hint(&word_request()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HintError>(),
            Some(HintError::EmptyResponse)
        ));
    }
}
