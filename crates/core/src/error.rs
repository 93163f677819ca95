//! Error types for the stagecrew domain.
//!
//! Each bounded context owns its error enum. This one covers the text-generation
//! capability; configuration and pipeline errors live in their own crates.

use thiserror::Error;

/// Failures of the opaque text-generation capability.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned an empty response: {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Whether the failure suggests the provider endpoint is not reachable at all
    /// (as opposed to reachable but refusing the request).
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::NotConfigured(_))
    }
}
