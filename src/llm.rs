//! Completion collaborator
//!
//! A provider-agnostic completion trait plus the OpenAI implementation backed
//! by rig-core. Stages hold an `Arc<dyn CompletionProvider>` so tests can
//! substitute scripted providers.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai::Client;
use tracing::debug;

use crate::error::CompletionError;

/// Prompt in, text out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a single prompt and return the raw completion text.
    async fn complete(&self, prompt: &str, temperature: f64) -> Result<String, CompletionError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// OpenAI completion provider
///
/// Wraps rig-core's OpenAI client with an explicit API key.
///
/// # Example
///
/// ```rust,ignore
/// let provider = OpenAIProvider::new(&config.openai_api_key, "gpt-4");
/// let text = provider.complete("Say hello", 0.2).await?;
/// ```
pub struct OpenAIProvider {
    client: Client,
    model: String,
}

impl OpenAIProvider {
    /// Create a provider for `model` authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key: String = api_key.into();
        Self {
            client: Client::from_val(api_key.into()),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, temperature: f64) -> Result<String, CompletionError> {
        debug!(model = %self.model, temperature, prompt_len = prompt.len(), "Sending completion request");

        let agent = self
            .client
            .agent(&self.model)
            .temperature(temperature)
            .build();

        let response = agent
            .prompt(prompt)
            .await
            .map_err(|e| CompletionError::Request(format!("OpenAI completion failed: {}", e)))?;

        if response.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }

        Ok(response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
