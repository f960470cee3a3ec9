//! Google Gemini `generateContent` client

use super::{check_status, decode, http_client, non_empty, send};
use super::{ClientOptions, GenerationClient, GenerationError, Provider};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Gemini authenticates with the key in the query string
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String, options: ClientOptions) -> Result<Self> {
        let timeout = options
            .timeout
            .unwrap_or_else(|| Provider::Gemini.default_timeout());
        let url = match options.endpoint {
            Some(endpoint) => endpoint,
            None => format!(
                "{}/{}:generateContent",
                GEMINI_API_BASE,
                options.model.as_deref().unwrap_or(GEMINI_MODEL)
            ),
        };

        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            url,
            timeout,
        })
    }

    fn extract_text(response: GeminiResponse) -> Option<String> {
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text.filter(|text| !text.trim().is_empty()))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
        debug!(provider = "gemini", "Sending request to Gemini API");

        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let request = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);

        let (status, text) = send(Provider::Gemini, self.timeout, request).await?;
        let response: GeminiResponse = decode(Provider::Gemini, status, &text)?;

        if let Some(error) = response.error {
            return Err(GenerationError::Remote {
                provider: Provider::Gemini,
                status: Some(status.as_u16()),
                code: error.code.to_string(),
                message: error.message,
            });
        }
        check_status(Provider::Gemini, status, &text)?;

        let result = non_empty(Provider::Gemini, Self::extract_text(response))?;
        debug!(
            provider = "gemini",
            length = result.len(),
            "Received response from Gemini API"
        );
        Ok(result)
    }
}
