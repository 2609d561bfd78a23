//! Pluggable hosted AI backend abstraction
//!
//! # Architecture
//!
//! - `AIBackend` trait: prompt in, completion text out
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//! - `AiConfig`: explicit configuration built once at startup
//!
//! # Configuration
//!
//! Environment variables (read by [`AiConfig::from_env`]):
//! - `AI_BACKEND`: gemini (default), openai_compatible, mock
//! - `GEMINI_API_KEY`: credential; without it the gemini backend is disabled
//! - `GEMINI_MODEL`: model name (default: gemini-2.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OPENAI_COMPATIBLE_API_KEY`: credential for the openai_compatible backend
//! - `OPENAI_COMPATIBLE_MODEL`: model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_HOST`: API base URL (default: https://api.openai.com)
//! - `TALLY_AI_TIMEOUT_SECS`: per-request timeout (default: 60)

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini API base URL
pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
/// Default OpenAI-compatible model
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Default OpenAI-compatible API base URL
pub const DEFAULT_OPENAI_HOST: &str = "https://api.openai.com";
/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send a prompt and return the model's text completion
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable and the credential accepted
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Which backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Gemini,
    OpenAICompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai_compatible" | "openai" => Ok(Self::OpenAICompatible),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI configuration, built once at process start and passed down explicitly
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub backend: BackendKind,
    /// Credential; `None` means AI is disabled (except for the mock backend)
    pub api_key: Option<String>,
    pub model: String,
    pub host: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Gemini,
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            host: DEFAULT_GEMINI_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    /// Configuration with AI turned off
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Configuration for the in-process mock backend
    pub fn mock() -> Self {
        Self {
            backend: BackendKind::Mock,
            model: "mock".to_string(),
            host: "mock://localhost".to_string(),
            ..Self::default()
        }
    }

    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match var("AI_BACKEND") {
            Some(name) => name.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Unknown AI_BACKEND, falling back to gemini");
                BackendKind::Gemini
            }),
            None => BackendKind::Gemini,
        };

        let timeout = var("TALLY_AI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let (api_key, model, host) = match backend {
            BackendKind::Gemini => (
                var("GEMINI_API_KEY"),
                var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                var("GEMINI_HOST").unwrap_or_else(|| DEFAULT_GEMINI_HOST.to_string()),
            ),
            BackendKind::OpenAICompatible => (
                var("OPENAI_COMPATIBLE_API_KEY"),
                var("OPENAI_COMPATIBLE_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                var("OPENAI_COMPATIBLE_HOST").unwrap_or_else(|| DEFAULT_OPENAI_HOST.to_string()),
            ),
            BackendKind::Mock => return Self::mock(),
        };

        Self {
            backend,
            api_key,
            model,
            host,
            timeout: Duration::from_secs(timeout),
        }
    }

    /// Whether AI calls will be attempted at all
    pub fn is_enabled(&self) -> bool {
        self.backend == BackendKind::Mock || self.api_key.is_some()
    }
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini (generateContent REST API)
    Gemini(GeminiBackend),
    /// Any server implementing the OpenAI chat completions API
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create a client from configuration
    ///
    /// Returns None when no credential is configured (degraded mode).
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        let client = match config.backend {
            BackendKind::Gemini => AIClient::Gemini(GeminiBackend::new(
                &config.host,
                &config.model,
                config.api_key.as_deref()?,
                config.timeout,
            )),
            BackendKind::OpenAICompatible => {
                AIClient::OpenAICompatible(OpenAICompatibleBackend::new(
                    &config.host,
                    &config.model,
                    config.api_key.as_deref()?,
                    config.timeout,
                ))
            }
            BackendKind::Mock => AIClient::Mock(MockBackend::new()),
        };
        Some(client)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend name for logging and status output
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => BackendKind::Gemini.as_str(),
            AIClient::OpenAICompatible(_) => BackendKind::OpenAICompatible.as_str(),
            AIClient::Mock(_) => BackendKind::Mock.as_str(),
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(prompt).await,
            AIClient::OpenAICompatible(b) => b.generate(prompt).await,
            AIClient::Mock(b) => b.generate(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
