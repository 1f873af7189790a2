//! Model providers
//!
//! A [`ModelProvider`] turns a conversation plus tool definitions into the
//! next assistant message. [`BedrockProvider`] is the production backend.

#[cfg(feature = "bedrock")]
pub mod bedrock;

use crate::types::{Message, ToolDefinition};

#[cfg(feature = "bedrock")]
pub use bedrock::BedrockProvider;

pub use crate::model::ModelResponse;

/// Errors from a model provider, grouped by what the caller can do about them
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait ModelProvider: Send + Sync {
    /// Display name of the model behind this provider
    fn name(&self) -> &str;

    fn max_context_tokens(&self) -> usize;

    fn max_output_tokens(&self) -> usize;

    /// Rough estimate, about four characters per token
    fn estimate_token_count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }

    fn estimate_message_tokens(&self, messages: &[Message]) -> usize {
        messages
            .iter()
            .map(|message| {
                4 + message
                    .content
                    .iter()
                    .map(|block| self.estimate_token_count(&format!("{:?}", block)))
                    .sum::<usize>()
            })
            .sum()
    }

    /// Produce the next assistant message.
    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError>;
}

#[async_trait::async_trait]
impl ModelProvider for std::sync::Arc<dyn ModelProvider> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn max_context_tokens(&self) -> usize {
        (**self).max_context_tokens()
    }

    fn max_output_tokens(&self) -> usize {
        (**self).max_output_tokens()
    }

    fn estimate_token_count(&self, text: &str) -> usize {
        (**self).estimate_token_count(text)
    }

    fn estimate_message_tokens(&self, messages: &[Message]) -> usize {
        (**self).estimate_message_tokens(messages)
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        (**self).generate(messages, tools, system_prompt).await
    }
}
