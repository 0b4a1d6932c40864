/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which turns one batch of
 * subtitle text into a prompt, sends it to the configured provider and returns
 * the raw reply.
 */

use log::{debug, info};
use std::sync::Arc;

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::{self, CompletionRequest, Provider};

use super::prompts::TranslationPromptBuilder;

/// Main translation service for batch translation
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn Provider>,

    /// Phrase selection for prompts
    prompts: TranslationPromptBuilder,

    /// Sampling temperature sent with every request
    temperature: f32,
}

impl TranslationService {
    /// Create a new translation service with the provider selected in `config`
    pub fn new(config: &TranslationConfig) -> Result<Self, ProviderError> {
        let provider = providers::create_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Create a service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self {
            provider,
            prompts: TranslationPromptBuilder::from_seed(config.common.prompt_seed),
            temperature: config.common.temperature,
        }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Translate one batch.
    ///
    /// `batch_index` is zero-based; batch 0 without a moderation hint gets the full
    /// opening instruction. Provider errors are returned as they are, nothing is retried
    /// here.
    pub async fn translate_batch(
        &self,
        text: &str,
        target_language: &str,
        batch_index: usize,
        moderation: Option<&str>,
    ) -> Result<String, TranslationError> {
        let language_name = language_utils::prompt_language_name(target_language);
        let instructions = self.prompts.instructions(&language_name, batch_index, moderation);
        info!("Sending prompt: {}", instructions);

        let prompt = TranslationPromptBuilder::wrap_payload(&instructions, text);
        let request = CompletionRequest::new(prompt).temperature(self.temperature);

        let reply = self.provider.complete(request).await?;
        debug!("Raw reply from {}: {}", self.provider.name(), reply);

        Ok(reply.trim().to_string())
    }
}
