//! AI Provider trait and configuration.
//!
//! Defines the interface that text-generation backends must implement.

use crate::{LessonError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Configuration for an AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Model identifier (e.g., "claude-3-haiku-20240307", "gpt-4o-mini").
    pub model: String,

    /// Base URL for the API.
    pub base_url: Option<String>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Create a new provider config with API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }
}

/// A single prompt sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Role and output-format instructions.
    pub system_prompt: String,

    /// The lesson-specific request.
    pub prompt: String,
}

/// Raw text returned by the provider.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// The generated text, untrusted.
    pub text: String,

    /// Tokens used for the request.
    pub tokens_used: Option<u32>,
}

/// Trait that AI providers must implement.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Send one prompt and return the model's text.
    ///
    /// Implementations make a single attempt; callers decide what a failure means.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}

/// What a [`MockProvider`] does when called.
#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Fail(String),
    Hang,
}

/// A scripted provider for testing.
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockProvider {
    /// A provider that always returns `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Reply(text.into()))
    }

    /// A provider that always fails with a network error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.into()))
    }

    /// A provider that never answers.
    pub fn hanging() -> Self {
        Self::with_behavior(MockBehavior::Hang)
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(GenerationResponse {
                text: text.clone(),
                tokens_used: Some(10),
            }),
            MockBehavior::Fail(message) => Err(LessonError::NetworkError(message.clone())),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(LessonError::ProviderError("mock provider stopped hanging".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "system".to_string(),
            prompt: "Write a lesson".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_provider_reply() {
        let provider = MockProvider::replying("{\"objectives\": \"x\"}");
        let response = provider.generate(request()).await.unwrap();
        assert_eq!(response.text, "{\"objectives\": \"x\"}");
        assert_eq!(provider.requests(), vec![request()]);
    }

    #[tokio::test]
    async fn test_mock_provider_failure() {
        let provider = MockProvider::failing("connection refused");
        let err = provider.generate(request()).await.unwrap_err();
        assert!(matches!(err, LessonError::NetworkError(_)));
    }

    #[test]
    fn test_temperature_is_clamped() {
        let config = ProviderConfig::new("key", "model").with_temperature(5.0);
        assert_eq!(config.temperature, Some(2.0));
    }
}
