use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use log::error;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, Provider};

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API, without trailing slash
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name used for generation
    model: String,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Non-streaming response from `/api/generate`
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    pub model: String,
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: false,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a client for `endpoint`; a bare `host[:port]` gets an `http://` scheme
    /// and the default port 11434.
    pub fn new(endpoint: &str, model: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        Ok(Self {
            base_url: Self::normalize_endpoint(endpoint)?,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama serves HTTP/1.1 only
                .http1_only()
                .build()
                .unwrap_or_default(),
            model: model.into(),
        })
    }

    /// Normalize an endpoint string into `scheme://host:port`
    pub fn normalize_endpoint(endpoint: &str) -> Result<String, ProviderError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ProviderError::RequestFailed("Ollama endpoint cannot be empty".to_string()));
        }

        let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };

        let url = Url::parse(&with_scheme)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid Ollama endpoint '{}': {}", endpoint, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ProviderError::RequestFailed(format!("Invalid host in endpoint: {}", endpoint)))?;
        let port = url.port().unwrap_or(11434);

        Ok(format!("{}://{}:{}", url.scheme(), host, port))
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send request to Ollama API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let generation = GenerationRequest::new(&self.model, request.prompt).temperature(request.temperature);
        let response = self.generate(&generation).await?;
        Ok(response.response)
    }
}
