//! Error types used throughout the aggregation layer

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified failure from one external travel provider.
///
/// Constructed at the provider-client boundary; the retry policy and the
/// aggregation facade reason about this type rather than raw transport
/// errors.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{provider}: {message}")]
pub struct ProviderError {
    /// Provider name ("amadeus", "duffel", "awardwallet").
    pub provider: String,
    /// HTTP status of the failing response, absent for transport failures.
    pub status: Option<u16>,
    /// Human-readable message, kept verbatim from the provider where possible.
    pub message: String,
    /// Whether the failure is transient and safe to reattempt after a delay.
    pub retryable: bool,
}

impl ProviderError {
    /// Network/connection failure: no HTTP status, always retryable.
    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self { provider: provider.into(), status: None, message: message.into(), retryable: true }
    }

    /// Failure carrying an HTTP status; retryability follows the status class
    /// (429 and 5xx are transient, everything else is fatal).
    pub fn http(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let retryable = status == 429 || (500..600).contains(&status);
        Self { provider: provider.into(), status: Some(status), message: message.into(), retryable }
    }

    /// Missing or invalid credentials/configuration: fatal at call time.
    pub fn config(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self { provider: provider.into(), status: None, message: message.into(), retryable: false }
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

/// Main error type for Voyagr
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum VoyagrError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Provider error: {0}")]
    Provider(ProviderError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProviderError> for VoyagrError {
    fn from(err: ProviderError) -> Self {
        VoyagrError::Provider(err)
    }
}

/// Result type alias for Voyagr operations
pub type Result<T> = std::result::Result<T, VoyagrError>;
