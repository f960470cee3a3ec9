use super::Provider;
use crate::error::{ErrorCode, ScriptportError};
use std::time::Duration;

/// Classified failure of a single generation call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request to {provider} API failed: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {provider} API timed out after {timeout:?}")]
    Timeout { provider: Provider, timeout: Duration },

    #[error("{provider} API error [{code}]: {message}")]
    Remote {
        provider: Provider,
        status: Option<u16>,
        code: String,
        message: String,
    },

    #[error("failed to decode {provider} API response: {source}")]
    MalformedResponse {
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty response from {provider} API")]
    EmptyResult { provider: Provider },
}

impl GenerationError {
    pub fn provider(&self) -> Provider {
        match self {
            Self::Transport { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Remote { provider, .. }
            | Self::MalformedResponse { provider, .. }
            | Self::EmptyResult { provider } => *provider,
        }
    }

    /// Error code within the generation range
    pub fn code(&self) -> u16 {
        match self {
            Self::Transport { .. } => ErrorCode::GEN_TRANSPORT,
            Self::Timeout { .. } => ErrorCode::GEN_TIMEOUT,
            Self::Remote { .. } => ErrorCode::GEN_REMOTE_ERROR,
            Self::MalformedResponse { .. } => ErrorCode::GEN_MALFORMED_RESPONSE,
            Self::EmptyResult { .. } => ErrorCode::GEN_EMPTY_RESULT,
        }
    }
}

impl From<GenerationError> for ScriptportError {
    fn from(err: GenerationError) -> Self {
        let provider = err.provider().to_string();
        ScriptportError::generation_with_code(err.code(), err.to_string(), Some(provider))
            .with_source(err)
    }
}
