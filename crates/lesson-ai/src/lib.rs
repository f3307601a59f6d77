//! # Lesson AI
//!
//! AI provider implementations for lesson content generation.
//!
//! - **Anthropic**: Claude models (default)
//! - **OpenAI**: GPT models and compatible gateways
//!
//! ## Example
//!
//! ```rust,ignore
//! use lesson_core::LessonConfig;
//!
//! // Template-only when no API key is configured
//! let resolver = lesson_ai::resolver_from_config(&LessonConfig::from_env())?;
//! let content = resolver.resolve(&request).await;
//! ```

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// Re-export core types for convenience.
pub use lesson_core::{
    AiBackend, AiProvider, AiSettings, ContentResolver, LessonConfig, LessonError,
    ProviderConfig, Result,
};

use std::sync::Arc;
use tracing::info;

/// Create an Anthropic provider with a single line.
///
/// ```rust,ignore
/// let provider = lesson_ai::anthropic("claude-3-haiku-20240307")?;
/// ```
pub fn anthropic(model: &str) -> Result<AnthropicProvider> {
    AnthropicProvider::from_env_with_model(model)
}

/// Create an OpenAI provider with a single line.
pub fn openai(model: &str) -> Result<OpenAiProvider> {
    OpenAiProvider::from_env_with_model(model)
}

/// Build the provider described by `settings`.
pub fn provider_from_settings(settings: &AiSettings) -> Result<Arc<dyn AiProvider>> {
    let provider: Arc<dyn AiProvider> = match settings.backend {
        AiBackend::Anthropic => Arc::new(AnthropicProvider::new(settings.provider.clone())?),
        AiBackend::OpenAi => Arc::new(OpenAiProvider::new(settings.provider.clone())?),
    };
    Ok(provider)
}

/// Build a content resolver for `config`.
///
/// Without AI settings the resolver is template-only.
pub fn resolver_from_config(config: &LessonConfig) -> Result<ContentResolver> {
    let resolver = match &config.ai {
        Some(settings) => {
            info!(
                "AI generation enabled ({}, model {})",
                provider_label(settings.backend),
                settings.provider.model
            );
            ContentResolver::from_shared(provider_from_settings(settings)?)
        }
        None => {
            info!("AI generation disabled, using template content");
            ContentResolver::template_only()
        }
    };
    Ok(resolver.with_timeout(config.ai_timeout_seconds))
}

fn provider_label(backend: AiBackend) -> &'static str {
    match backend {
        AiBackend::Anthropic => "anthropic",
        AiBackend::OpenAi => "openai",
    }
}

/// Map a transport failure, keeping client timeouts distinguishable.
pub(crate) fn transport_error(error: reqwest::Error, timeout_seconds: Option<u64>) -> LessonError {
    if error.is_timeout() {
        LessonError::Timeout(timeout_seconds.unwrap_or(60))
    } else {
        LessonError::NetworkError(error.to_string())
    }
}
