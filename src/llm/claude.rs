//! Anthropic messages API client

use super::{check_status, decode, http_client, non_empty, send};
use super::{ClientOptions, GenerationClient, GenerationError, Provider};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

/// Claude authenticates with an `x-api-key` header
pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
    timeout: Duration,
}

impl ClaudeClient {
    pub fn new(api_key: String, options: ClientOptions) -> Result<Self> {
        let timeout = options
            .timeout
            .unwrap_or_else(|| Provider::Claude.default_timeout());

        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            url: options
                .endpoint
                .unwrap_or_else(|| CLAUDE_API_URL.to_string()),
            model: options.model.unwrap_or_else(|| CLAUDE_MODEL.to_string()),
            timeout,
        })
    }

    /// First `text` block; tool-use and other block kinds are skipped
    fn extract_text(response: MessagesResponse) -> Option<String> {
        response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text.filter(|text| !text.trim().is_empty()))
    }
}

#[async_trait]
impl GenerationClient for ClaudeClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        debug!(provider = "claude", model = %self.model, "Sending request to Claude API");

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };
        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let (status, text) = send(Provider::Claude, self.timeout, request).await?;
        let response: MessagesResponse = decode(Provider::Claude, status, &text)?;

        if let Some(error) = response.error {
            return Err(GenerationError::Remote {
                provider: Provider::Claude,
                status: Some(status.as_u16()),
                code: error.kind,
                message: error.message,
            });
        }
        check_status(Provider::Claude, status, &text)?;

        let result = non_empty(Provider::Claude, Self::extract_text(response))?;
        debug!(
            provider = "claude",
            length = result.len(),
            "Received response from Claude API"
        );
        Ok(result)
    }
}
