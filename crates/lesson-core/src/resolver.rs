//! Content Resolver - AI-primary lesson content with template fallback.
//!
//! The resolver always returns usable [`LessonContent`]: any AI failure,
//! timeout or malformed reply degrades to the [`TemplateEngine`] result.

use crate::extract::extract_content;
use crate::prompt::build_request;
use crate::{AiProvider, LessonContent, LessonError, LessonRequest, TemplateEngine};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Why the template engine produced the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No AI provider is configured.
    Disabled,
    /// The provider returned an error.
    ProviderFailed(String),
    /// The provider did not answer within the timeout.
    TimedOut(u64),
    /// The reply held no usable lesson JSON.
    Unparseable(String),
    /// The reply's tier keys differ from the tiers the request calls for.
    InconsistentTiers(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Disabled => write!(f, "AI generation disabled"),
            FallbackReason::ProviderFailed(e) => write!(f, "provider failed: {}", e),
            FallbackReason::TimedOut(secs) => write!(f, "provider timed out after {}s", secs),
            FallbackReason::Unparseable(e) => write!(f, "unusable reply: {}", e),
            FallbackReason::InconsistentTiers(e) => write!(f, "inconsistent tiers: {}", e),
        }
    }
}

/// Where resolved content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Ai { provider: String },
    Template { reason: FallbackReason },
}

/// Content plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    pub content: LessonContent,
    pub source: ContentSource,
}

/// Resolves lesson content, preferring the AI provider when one is set.
///
/// # Example
///
/// ```rust,ignore
/// use lesson_core::ContentResolver;
/// use lesson_ai::AnthropicProvider;
///
/// let resolver = ContentResolver::new(AnthropicProvider::from_env()?)
///     .with_timeout(30);
/// let content = resolver.resolve(&request).await;
/// ```
#[derive(Clone)]
pub struct ContentResolver {
    /// The AI provider, if AI generation is enabled.
    provider: Option<Arc<dyn AiProvider>>,

    /// Deterministic fallback.
    templates: TemplateEngine,

    /// Upper bound on the single provider call.
    timeout_seconds: u64,
}

impl ContentResolver {
    /// Create a resolver backed by `provider`.
    pub fn new(provider: impl AiProvider + 'static) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    /// Create a resolver from an already shared provider.
    pub fn from_shared(provider: Arc<dyn AiProvider>) -> Self {
        Self {
            provider: Some(provider),
            templates: TemplateEngine::new(),
            timeout_seconds: 60,
        }
    }

    /// Create a resolver that only uses the template engine.
    pub fn template_only() -> Self {
        Self {
            provider: None,
            templates: TemplateEngine::new(),
            timeout_seconds: 60,
        }
    }

    /// Set the provider call timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Whether an AI provider is configured.
    pub fn ai_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve content for a request. Never fails.
    pub async fn resolve(&self, request: &LessonRequest) -> LessonContent {
        self.resolve_detailed(request).await.content
    }

    /// Resolve content and report where it came from.
    #[instrument(skip(self, request), fields(topic = %request.topic()))]
    pub async fn resolve_detailed(&self, request: &LessonRequest) -> ResolvedContent {
        let Some(provider) = self.provider.as_ref() else {
            debug!("No AI provider configured, using templates");
            return self.fallback(request, FallbackReason::Disabled);
        };

        match self.try_provider(provider.as_ref(), request).await {
            Ok(content) => {
                info!("Using AI content from {}", provider.name());
                ResolvedContent {
                    content,
                    source: ContentSource::Ai {
                        provider: provider.name().to_string(),
                    },
                }
            }
            Err(reason) => {
                warn!("Falling back to template content: {}", reason);
                self.fallback(request, reason)
            }
        }
    }

    /// One attempt at the provider; no retries.
    async fn try_provider(
        &self,
        provider: &dyn AiProvider,
        request: &LessonRequest,
    ) -> Result<LessonContent, FallbackReason> {
        let generation = build_request(request);
        debug!("Calling AI provider: {}", provider.name());

        let call = provider.generate(generation);
        let response = match tokio::time::timeout(Duration::from_secs(self.timeout_seconds), call).await {
            Ok(Ok(response)) => response,
            Ok(Err(LessonError::Timeout(secs))) => return Err(FallbackReason::TimedOut(secs)),
            Ok(Err(e)) => return Err(FallbackReason::ProviderFailed(e.to_string())),
            Err(_) => return Err(FallbackReason::TimedOut(self.timeout_seconds)),
        };

        debug!(
            "AI reply received ({} chars, {:?} tokens)",
            response.text.len(),
            response.tokens_used
        );

        extract_content(&response.text, request).map_err(|e| match e {
            LessonError::InconsistentTiers(detail) => FallbackReason::InconsistentTiers(detail),
            other => FallbackReason::Unparseable(other.to_string()),
        })
    }

    fn fallback(&self, request: &LessonRequest, reason: FallbackReason) -> ResolvedContent {
        ResolvedContent {
            content: self.templates.generate(request),
            source: ContentSource::Template { reason },
        }
    }
}

impl fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentResolver")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
