/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported LLM backends:
 * - OpenAI: OpenAI chat completions API (also used for LM Studio)
 * - Ollama: Local LLM server
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// A single text completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt, payload included
    pub prompt: String,

    /// Sampling temperature; 0 keeps replies deterministic
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with temperature 0
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.0,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Common trait for all LLM providers
///
/// The translation service only needs one capability: turn a prompt into a
/// single completion. Implementations are interchangeable behind `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name for log lines
    fn name(&self) -> &str;

    /// Complete a request and return the reply text
    ///
    /// # Arguments
    /// * `request` - The prompt and sampling settings
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The completion text or an error
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

/// Build the provider selected in the configuration
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let model = config.get_model();
    let endpoint = config.get_endpoint();
    let timeout_secs = config.get_timeout_secs();

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::OpenAI | TranslationProvider::LMStudio => Arc::new(openai::OpenAI::new(
            config.get_api_key(),
            endpoint,
            model,
            timeout_secs,
        )),
        TranslationProvider::Ollama => Arc::new(ollama::Ollama::new(&endpoint, model, timeout_secs)?),
    };

    Ok(provider)
}

pub mod mock;
pub mod ollama;
pub mod openai;
