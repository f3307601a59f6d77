//! # Lesson Configuration
//!
//! Central configuration for the lesson pipeline.
//! Supports loading from environment variables and programmatic defaults.

use crate::provider::ProviderConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default Anthropic model; fast and inexpensive.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";

/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Which AI service backs content generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBackend {
    Anthropic,
    OpenAi,
}

impl AiBackend {
    /// Provider-specific environment variable holding the API key.
    pub fn key_var(self) -> &'static str {
        match self {
            AiBackend::Anthropic => "ANTHROPIC_API_KEY",
            AiBackend::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            AiBackend::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            AiBackend::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

impl FromStr for AiBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(AiBackend::Anthropic),
            "openai" | "gpt" => Ok(AiBackend::OpenAi),
            other => Err(format!("unknown AI provider '{}'", other)),
        }
    }
}

/// A fully specified AI connection.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub backend: AiBackend,
    pub provider: ProviderConfig,
}

/// Configuration for a lesson generation run.
///
/// # Example
/// ```rust
/// use lesson_core::LessonConfig;
///
/// // Load from environment
/// let config = LessonConfig::from_env();
///
/// // Or customize
/// let config = LessonConfig::default()
///     .with_output_dir("build/lessons")
///     .with_ai_timeout(30);
/// assert!(config.ai.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LessonConfig {
    /// AI connection. `None` means template-only generation.
    /// Enabled when an API key is found, Env: LESSON_API_KEY / ANTHROPIC_API_KEY / OPENAI_API_KEY
    pub ai: Option<AiSettings>,

    /// Upper bound on the single AI call, in seconds.
    /// Default: 60, Env: LESSON_AI_TIMEOUT=30
    pub ai_timeout_seconds: u64,

    /// Directory generated documents are written to.
    /// Default: "output", Env: LESSON_OUTPUT_DIR
    pub output_dir: PathBuf,

    /// Prefix of the download locator returned with a finished package.
    /// Default: "/api/download", Env: LESSON_DOWNLOAD_PREFIX
    pub download_prefix: String,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            ai: None,
            ai_timeout_seconds: 60,
            output_dir: PathBuf::from("output"),
            download_prefix: "/api/download".to_string(),
        }
    }
}

impl LessonConfig {
    /// Create a new config from environment variables.
    /// Falls back to defaults for missing or unparseable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(n) = lookup("LESSON_AI_TIMEOUT").and_then(|v| v.parse().ok()) {
            config.ai_timeout_seconds = n;
        }
        if let Some(v) = lookup("LESSON_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("LESSON_DOWNLOAD_PREFIX") {
            config.download_prefix = v;
        }

        let backend = match lookup("LESSON_AI_PROVIDER") {
            Some(v) if v.eq_ignore_ascii_case("none") => None,
            Some(v) => match v.parse() {
                Ok(backend) => Some(backend),
                Err(e) => {
                    tracing::warn!("{}; AI generation disabled", e);
                    None
                }
            },
            None => Some(AiBackend::Anthropic),
        };

        config.ai = backend
            .and_then(|b| ai_settings_from_lookup(b, config.ai_timeout_seconds, &lookup));
        config
    }

    /// Builder: Use `backend`, taking its key and tuning from the environment.
    ///
    /// AI is disabled when no key is found for the backend.
    pub fn with_backend_from_env(mut self, backend: AiBackend) -> Self {
        self.ai = ai_settings_from_env(backend, self.ai_timeout_seconds);
        self
    }

    /// Builder: Set the AI connection.
    pub fn with_ai(mut self, backend: AiBackend, provider: ProviderConfig) -> Self {
        self.ai = Some(AiSettings { backend, provider });
        self
    }

    /// Builder: Disable AI generation.
    pub fn without_ai(mut self) -> Self {
        self.ai = None;
        self
    }

    /// Builder: Set the AI call timeout.
    pub fn with_ai_timeout(mut self, seconds: u64) -> Self {
        self.ai_timeout_seconds = seconds;
        if let Some(ai) = self.ai.as_mut() {
            ai.provider.timeout_seconds = Some(seconds);
        }
        self
    }

    /// Builder: Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder: Set the download prefix.
    pub fn with_download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.download_prefix = prefix.into();
        self
    }
}

/// AI settings for `backend` from the environment.
///
/// The key comes from `LESSON_API_KEY` or the backend's own variable; the
/// model, base URL, max tokens and temperature honour their `LESSON_*`
/// overrides. Returns `None` when no key is set.
pub fn ai_settings_from_env(backend: AiBackend, timeout_seconds: u64) -> Option<AiSettings> {
    ai_settings_from_lookup(backend, timeout_seconds, env_var)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn ai_settings_from_lookup(
    backend: AiBackend,
    timeout_seconds: u64,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<AiSettings> {
    let api_key = lookup("LESSON_API_KEY")
        .or_else(|| lookup(backend.key_var()))
        .filter(|k| !k.trim().is_empty())?;

    let model = lookup("LESSON_MODEL").unwrap_or_else(|| backend.default_model().to_string());

    let mut provider = ProviderConfig::new(api_key, model)
        .with_max_tokens(4000)
        .with_temperature(0.7)
        .with_timeout(timeout_seconds);

    if let Some(n) = lookup("LESSON_MAX_TOKENS").and_then(|v| v.parse().ok()) {
        provider = provider.with_max_tokens(n);
    }
    if let Some(t) = lookup("LESSON_TEMPERATURE").and_then(|v| v.parse().ok()) {
        provider = provider.with_temperature(t);
    }
    if let Some(url) = lookup("LESSON_BASE_URL") {
        provider = provider.with_base_url(url);
    }

    Some(AiSettings { backend, provider })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LessonConfig::default();
        assert!(config.ai.is_none());
        assert_eq!(config.ai_timeout_seconds, 60);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.download_prefix, "/api/download");
    }

    #[test]
    fn test_builder_pattern() {
        let config = LessonConfig::default()
            .with_ai(AiBackend::OpenAi, ProviderConfig::new("k", DEFAULT_OPENAI_MODEL))
            .with_ai_timeout(15)
            .with_output_dir("out");

        let ai = config.ai.as_ref().unwrap();
        assert_eq!(ai.backend, AiBackend::OpenAi);
        assert_eq!(ai.provider.timeout_seconds, Some(15));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.without_ai().ai.is_none());
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_without_key_disables_ai() {
        let config = LessonConfig::from_lookup(vars(&[("LESSON_OUTPUT_DIR", "build")]));
        assert!(config.ai.is_none());
        assert_eq!(config.output_dir, PathBuf::from("build"));
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let config = LessonConfig::from_lookup(vars(&[
            ("LESSON_AI_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LESSON_MODEL", "gpt-4o"),
            ("LESSON_BASE_URL", "http://gateway.local/v1/chat/completions"),
            ("LESSON_MAX_TOKENS", "2500"),
            ("LESSON_TEMPERATURE", "0.2"),
            ("LESSON_AI_TIMEOUT", "20"),
            ("LESSON_DOWNLOAD_PREFIX", "/files"),
        ]));

        let ai = config.ai.as_ref().unwrap();
        assert_eq!(ai.backend, AiBackend::OpenAi);
        assert_eq!(ai.provider.api_key, "sk-test");
        assert_eq!(ai.provider.model, "gpt-4o");
        assert_eq!(
            ai.provider.base_url.as_deref(),
            Some("http://gateway.local/v1/chat/completions")
        );
        assert_eq!(ai.provider.max_tokens, Some(2500));
        assert_eq!(ai.provider.temperature, Some(0.2));
        assert_eq!(ai.provider.timeout_seconds, Some(20));
        assert_eq!(config.ai_timeout_seconds, 20);
        assert_eq!(config.download_prefix, "/files");
    }

    #[test]
    fn test_from_lookup_provider_none_or_unknown() {
        let none = LessonConfig::from_lookup(vars(&[
            ("LESSON_AI_PROVIDER", "none"),
            ("ANTHROPIC_API_KEY", "k"),
        ]));
        assert!(none.ai.is_none());

        let unknown = LessonConfig::from_lookup(vars(&[
            ("LESSON_AI_PROVIDER", "gemini"),
            ("LESSON_API_KEY", "k"),
        ]));
        assert!(unknown.ai.is_none());
    }

    #[test]
    fn test_settings_for_other_backend_keep_overrides() {
        // Default provider is anthropic; a different backend still sees the tuning vars.
        let lookup = vars(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LESSON_MODEL", "gpt-4o"),
            ("LESSON_BASE_URL", "http://gateway.local/v1/chat/completions"),
        ]);
        assert!(LessonConfig::from_lookup(&lookup).ai.is_none());

        let ai = ai_settings_from_lookup(AiBackend::OpenAi, 45, &lookup).unwrap();
        assert_eq!(ai.backend, AiBackend::OpenAi);
        assert_eq!(ai.provider.model, "gpt-4o");
        assert_eq!(
            ai.provider.base_url.as_deref(),
            Some("http://gateway.local/v1/chat/completions")
        );
        assert_eq!(ai.provider.max_tokens, Some(4000));
        assert_eq!(ai.provider.timeout_seconds, Some(45));
    }

    #[test]
    fn test_blank_key_is_absent() {
        let lookup = vars(&[("LESSON_API_KEY", "  ")]);
        assert!(ai_settings_from_lookup(AiBackend::Anthropic, 60, &lookup).is_none());
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!("Claude".parse::<AiBackend>().unwrap(), AiBackend::Anthropic);
        assert_eq!("openai".parse::<AiBackend>().unwrap(), AiBackend::OpenAi);
        assert!("gemini".parse::<AiBackend>().is_err());
    }
}
