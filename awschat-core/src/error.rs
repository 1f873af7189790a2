//! Top-level error type for awschat-core
//!
//! Flattens provider and agent errors into a few categories a caller can act
//! on. Match on the variant or use the `is_*` helpers.

use thiserror::Error;

use crate::agent::AgentError;
use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum Error {
    /// Credentials missing, expired, or lacking Bedrock access
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The model failed, refused, or never produced a final answer
    #[error("model error: {0}")]
    Model(String),

    /// Invalid setup, e.g. unknown model ID or missing provider
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Transient failures where the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Network(_) | Self::Unavailable(_)
        )
    }
}

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(msg) => Self::Auth(msg),
            ProviderError::RateLimited(msg) => Self::RateLimited(msg),
            ProviderError::Network(msg) => Self::Network(msg),
            ProviderError::ServiceUnavailable(msg) => Self::Unavailable(msg),
            ProviderError::Model(msg) => Self::Model(msg),
            ProviderError::Configuration(msg) => Self::Config(msg),
            ProviderError::Other(msg) => Self::Other(msg),
        }
    }
}

impl From<AgentError> for Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Provider(e) => e.into(),
            AgentError::NoResponse => Self::Model("model returned no response".to_string()),
            AgentError::EmptyResponse => Self::Model("model returned an empty response".to_string()),
            AgentError::MaxTokensExceeded => {
                Self::Model("response exceeded maximum token limit".to_string())
            }
            AgentError::ContentFiltered => {
                Self::Model("response was filtered by content moderation".to_string())
            }
            AgentError::MaxIterationsExceeded(n) => {
                Self::Model(format!("no final answer after {} model calls", n))
            }
            AgentError::UnexpectedStopReason(reason) => {
                Self::Model(format!("unexpected stop reason: {}", reason))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Generic messages the AWS SDK wraps around the underlying cause
const SDK_WRAPPER_PREFIXES: [&str; 7] = [
    "dispatch failure",
    "connector error",
    "failed to construct request",
    "response error",
    "service error",
    "unhandled error",
    "io error",
];

/// Messages of `err` and its sources, outermost first.
///
/// Empty messages and the AWS SDK's wrapper messages are left out, so the
/// last entry is the most specific cause.
pub fn error_chain_messages(err: &dyn std::error::Error) -> Vec<String> {
    let mut messages = Vec::new();
    let mut next = Some(err);
    while let Some(e) = next {
        let msg = e.to_string();
        if !msg.is_empty() && !SDK_WRAPPER_PREFIXES.iter().any(|p| msg.starts_with(p)) {
            messages.push(msg);
        }
        next = e.source();
    }
    messages
}
