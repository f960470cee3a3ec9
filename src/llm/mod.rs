//! Text-generation providers.
//!
//! Every provider implements [`GenerationClient`]: one prompt in, one block
//! of text (or a classified [`GenerationError`]) out. [`create_client`] binds
//! a provider to its credential.

pub mod claude;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod prompt;

pub use claude::ClaudeClient;
pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use mock::MockGenerationClient;
pub use openai::OpenAiClient;
pub use prompt::{build_repair_prompt, build_translation_prompt};

use crate::error::{ErrorCode, Result, ScriptportError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Remote generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::Gemini, Provider::OpenAi, Provider::Claude]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Claude => "claude",
        }
    }

    /// Per-provider request timeout
    pub fn default_timeout(&self) -> Duration {
        match self {
            Provider::Gemini => Duration::from_secs(60),
            Provider::OpenAi | Provider::Claude => Duration::from_secs(120),
        }
    }

    /// Comma-separated list of valid names, for error messages and help text
    pub fn valid_names() -> String {
        Self::all()
            .iter()
            .map(Provider::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ScriptportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "claude" => Ok(Provider::Claude),
            _ => Err(ScriptportError::config_with_code(
                ErrorCode::CONFIG_UNKNOWN_PROVIDER,
                format!(
                    "invalid provider '{}'. Valid providers: {}",
                    s,
                    Provider::valid_names()
                ),
            )),
        }
    }
}

/// Capability shared by every provider
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Which backend this client talks to
    fn provider(&self) -> Provider;

    /// Send one prompt and return the first text payload of the response
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// Overrides applied on top of a provider's built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Full request URL, replacing the provider's public endpoint
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Bind a provider to its credential.
///
/// The credential is checked here, before any request is attempted.
pub fn create_client(
    provider: Provider,
    api_key: &str,
    options: ClientOptions,
) -> Result<Arc<dyn GenerationClient>> {
    if api_key.trim().is_empty() {
        return Err(ScriptportError::config_with_code(
            ErrorCode::CONFIG_MISSING_CREDENTIAL,
            format!("API key is required for provider {}", provider),
        ));
    }

    let client: Arc<dyn GenerationClient> = match provider {
        Provider::Gemini => Arc::new(GeminiClient::new(api_key.to_string(), options)?),
        Provider::OpenAi => Arc::new(OpenAiClient::new(api_key.to_string(), options)?),
        Provider::Claude => Arc::new(ClaudeClient::new(api_key.to_string(), options)?),
    };
    Ok(client)
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| {
            ScriptportError::config_with_code(
                ErrorCode::CONFIG_HTTP_CLIENT,
                format!("Failed to create HTTP client: {}", e),
            )
            .with_source(e)
        })
}

/// Send a prepared request and read the full body
pub(crate) async fn send(
    provider: Provider,
    timeout: Duration,
    request: reqwest::RequestBuilder,
) -> std::result::Result<(StatusCode, String), GenerationError> {
    // the request URL may carry the credential (gemini's `?key=`)
    let transport = |source: reqwest::Error| {
        if source.is_timeout() {
            GenerationError::Timeout { provider, timeout }
        } else {
            GenerationError::Transport {
                provider,
                source: source.without_url(),
            }
        }
    };

    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    Ok((status, body))
}

/// Decode a provider envelope.
///
/// A body that cannot be decoded is a remote error when the status was not
/// 2xx, and a malformed response otherwise.
pub(crate) fn decode<T: DeserializeOwned>(
    provider: Provider,
    status: StatusCode,
    body: &str,
) -> std::result::Result<T, GenerationError> {
    serde_json::from_str(body).map_err(|source| {
        if status.is_success() {
            GenerationError::MalformedResponse { provider, source }
        } else {
            GenerationError::Remote {
                provider,
                status: Some(status.as_u16()),
                code: status.as_u16().to_string(),
                message: body.trim().to_string(),
            }
        }
    })
}

/// Reject a non-2xx status whose envelope carried no error object
pub(crate) fn check_status(
    provider: Provider,
    status: StatusCode,
    body: &str,
) -> std::result::Result<(), GenerationError> {
    if status.is_success() {
        return Ok(());
    }
    Err(GenerationError::Remote {
        provider,
        status: Some(status.as_u16()),
        code: status.as_u16().to_string(),
        message: body.trim().to_string(),
    })
}

/// Treat a missing or blank payload as an empty result
pub(crate) fn non_empty(
    provider: Provider,
    text: Option<String>,
) -> std::result::Result<String, GenerationError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GenerationError::EmptyResult { provider }),
    }
}
