//! Anthropic Claude provider implementation.

use crate::transport_error;
use async_trait::async_trait;
use lesson_core::{
    config::DEFAULT_ANTHROPIC_MODEL,
    provider::{GenerationRequest, GenerationResponse},
    AiProvider, LessonError, ProviderConfig, Result,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider for lesson generation.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

/// Anthropic message request.
#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Anthropic message response.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.unwrap_or(60);
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .map_err(|e| LessonError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `ANTHROPIC_API_KEY` and optionally `ANTHROPIC_MODEL`.
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string());
        Self::from_env_with_model(&model)
    }

    /// Create a provider from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| LessonError::ConfigError("ANTHROPIC_API_KEY not set".to_string()))?;

        let config = ProviderConfig::new(api_key, model)
            .with_max_tokens(4000)
            .with_temperature(0.7);
        Self::new(config)
    }

    fn message_request(&self, request: GenerationRequest) -> MessageRequest {
        MessageRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens.unwrap_or(4000),
            system: request.system_prompt,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(model = %self.config.model))]
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        debug!("Requesting lesson content from Anthropic");

        let api_request = self.message_request(request);
        let url = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| transport_error(e, self.config.timeout_seconds))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LessonError::ProviderError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let msg_response: MessageResponse = response
            .json()
            .await
            .map_err(|e| LessonError::ProviderError(e.to_string()))?;

        let text = msg_response
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(GenerationResponse {
            text,
            tokens_used: msg_response.usage.map(|u| u.input_tokens + u.output_tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "You are a curriculum designer.".to_string(),
            prompt: "Plan a lesson on Newton's Laws.".to_string(),
        }
    }

    fn provider(server: &MockServer) -> AnthropicProvider {
        let config = ProviderConfig::new("test-key", DEFAULT_ANTHROPIC_MODEL)
            .with_base_url(format!("{}/v1/messages", server.uri()))
            .with_max_tokens(4000)
            .with_timeout(5);
        AnthropicProvider::new(config).unwrap()
    }

    #[test]
    fn test_message_request_shape() {
        let config = ProviderConfig::new("k", DEFAULT_ANTHROPIC_MODEL).with_temperature(0.7);
        let provider = AnthropicProvider::new(config).unwrap();

        let body = serde_json::to_value(provider.message_request(request())).unwrap();
        assert_eq!(body["model"], DEFAULT_ANTHROPIC_MODEL);
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["system"], "You are a curriculum designer.");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "text", "text": "{\"objectives\": "},
                    {"type": "text", "text": "\"x\"}"}
                ],
                "usage": {"input_tokens": 120, "output_tokens": 30}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server).generate(request()).await.unwrap();
        assert_eq!(response.text, "{\"objectives\": \"x\"}");
        assert_eq!(response.tokens_used, Some(150));
    }

    #[tokio::test]
    async fn test_rate_limit_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate_limit_error"))
            .mount(&server)
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        match err {
            LessonError::ProviderError(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate_limit_error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        assert!(matches!(err, LessonError::ProviderError(_)));
    }
}
