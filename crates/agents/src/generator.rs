//! Prompt-in, text-out wrapper around a [`Provider`].

use stagecrew_config::AppConfig;
use stagecrew_core::error::ProviderError;
use stagecrew_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sends single-prompt requests to a provider and returns the trimmed reply.
///
/// Cheap to clone; every agent of a team holds its own copy.
#[derive(Clone)]
pub struct TextGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl TextGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            timeout: None,
        }
    }

    /// Model, temperature, max tokens and stage timeout from `config`.
    ///
    /// The default provider's own `default_model` wins over the global one.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let mut generator = Self::new(provider, config.active_model())
            .with_temperature(config.default_temperature);
        generator.max_tokens = config.default_max_tokens;
        generator.timeout = config.team.stage_timeout_secs.map(Duration::from_secs);
        generator
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Bound each provider call. Expiry surfaces as [`ProviderError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate a reply to `prompt`. Blank replies are an error.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut request = ProviderRequest::prompt(&self.model, prompt);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "Generating"
        );

        let call = self.provider.complete(request);
        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ProviderError::Timeout(format!(
                    "{} did not answer within {}s",
                    self.provider.name(),
                    limit.as_secs()
                ))
            })??,
            None => call.await?,
        };

        let text = response.message.content.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse(format!(
                "model {} returned a blank reply",
                response.model
            )));
        }
        Ok(text.to_string())
    }
}
