//! OpenAI chat completions client

use super::{check_status, decode, http_client, non_empty, send};
use super::{ClientOptions, GenerationClient, GenerationError, Provider};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<serde_json::Value>,
}

impl ApiError {
    fn code(&self) -> String {
        self.kind
            .clone()
            .or_else(|| match &self.code {
                Some(serde_json::Value::String(code)) => Some(code.clone()),
                Some(serde_json::Value::Number(code)) => Some(code.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// OpenAI authenticates with a bearer token
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: String, options: ClientOptions) -> Result<Self> {
        let timeout = options
            .timeout
            .unwrap_or_else(|| Provider::OpenAi.default_timeout());

        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            url: options
                .endpoint
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            model: options.model.unwrap_or_else(|| OPENAI_MODEL.to_string()),
            timeout,
        })
    }

    fn extract_text(response: ChatResponse) -> Option<String> {
        response.choices.into_iter().next()?.message?.content
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        debug!(provider = "openai", model = %self.model, "Sending request to OpenAI API");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body);

        let (status, text) = send(Provider::OpenAi, self.timeout, request).await?;
        let response: ChatResponse = decode(Provider::OpenAi, status, &text)?;

        if let Some(error) = response.error {
            return Err(GenerationError::Remote {
                provider: Provider::OpenAi,
                status: Some(status.as_u16()),
                code: error.code(),
                message: error.message,
            });
        }
        check_status(Provider::OpenAi, status, &text)?;

        let result = non_empty(Provider::OpenAi, Self::extract_text(response))?;
        debug!(
            provider = "openai",
            length = result.len(),
            "Received response from OpenAI API"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChatResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_first_choice() {
        let response = parse(
            r#"{"id":"chatcmpl-1","choices":[
                {"index":0,"message":{"role":"assistant","content":"package main"},"finish_reason":"stop"}]}"#,
        );
        assert_eq!(
            OpenAiClient::extract_text(response),
            Some("package main".to_string())
        );
    }

    #[test]
    fn test_empty_choices_yield_nothing() {
        assert_eq!(OpenAiClient::extract_text(parse(r#"{"choices":[]}"#)), None);
        assert_eq!(
            OpenAiClient::extract_text(parse(
                r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#
            )),
            None
        );
    }

    #[test]
    fn test_error_code_prefers_type() {
        let response = parse(
            r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#,
        );
        let error = response.error.unwrap();
        assert_eq!(error.code(), "requests");

        let response = parse(r#"{"error":{"message":"boom","type":null,"code":429}}"#);
        assert_eq!(response.error.unwrap().code(), "429");
    }
}
