use super::{GenerationClient, GenerationError, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Scripted [`GenerationClient`] that records every prompt it receives
#[derive(Clone)]
pub struct MockGenerationClient {
    provider: Provider,
    /// Responses handed out in order; an exhausted queue yields an empty result
    responses: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerationClient {
    #[must_use]
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_response(&self, response: Result<String, GenerationError>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn add_success_response(&self, text: &str) {
        self.add_response(Ok(text.to_string())).await;
    }

    pub async fn call_count(&self) -> usize {
        self.prompts.lock().await.len()
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new(Provider::Gemini)
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().await.push(prompt.to_string());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResult {
                provider: self.provider,
            }))
    }
}
