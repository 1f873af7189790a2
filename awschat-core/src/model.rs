//! Model metadata
//!
//! A model is a plain struct implementing [`Model`] (limits, token estimation)
//! and [`BedrockModel`] (API identifier). All API traffic goes through a
//! provider such as [`crate::BedrockProvider`].

use std::str::FromStr;

use crate::events::TokenUsage;
use crate::tool::ToolResult;
use crate::types::{ContentBlock, Message, StopReason};

/// Response from a model completion
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// The assistant's response message
    pub message: Message,
    pub stop_reason: StopReason,
    /// Token usage statistics, when the provider reports them
    pub usage: Option<TokenUsage>,
}

/// Core model metadata trait
pub trait Model: Send + Sync {
    /// Human-readable model name (e.g., "Claude Haiku 4.5")
    fn name(&self) -> &'static str;

    fn max_context_tokens(&self) -> usize;

    fn max_output_tokens(&self) -> usize;

    /// Estimate token count for text
    fn estimate_token_count(&self, text: &str) -> usize {
        text.len().div_ceil(4)
    }

    /// Estimate tokens for a conversation, including per-message overhead
    fn estimate_message_tokens(&self, messages: &[Message]) -> usize {
        messages
            .iter()
            .map(|m| {
                4 + m
                    .content
                    .iter()
                    .map(|b| self.estimate_content_block_tokens(b))
                    .sum::<usize>()
            })
            .sum()
    }

    fn estimate_content_block_tokens(&self, block: &ContentBlock) -> usize {
        match block {
            ContentBlock::Text(text) => self.estimate_token_count(text),
            ContentBlock::ToolUse(tool_use) => {
                self.estimate_token_count(&tool_use.name)
                    + self.estimate_token_count(&tool_use.id)
                    + self.estimate_token_count(&tool_use.input.to_string())
                    + 10
            }
            ContentBlock::ToolResult(result) => {
                let body = match &result.content {
                    ToolResult::Text(t) => self.estimate_token_count(t),
                    ToolResult::Json(v) => self.estimate_token_count(&v.to_string()),
                };
                self.estimate_token_count(&result.tool_use_id) + body + 10
            }
        }
    }
}

/// Cross-region inference profile for Bedrock
///
/// Some newer models (Claude 4.5 and later) can only be invoked through an
/// inference profile. The profile is a prefix on the model ID.
///
/// See: <https://docs.aws.amazon.com/bedrock/latest/userguide/cross-region-inference.html>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferenceProfile {
    /// Single-region invocation in the SDK's configured region
    #[default]
    None,
    US,
    EU,
    APAC,
    /// Any commercial AWS region
    Global,
}

impl InferenceProfile {
    /// Apply this inference profile to a base model ID
    pub fn apply_to(&self, base_model_id: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}.{}", prefix, base_model_id),
            None => base_model_id.to_string(),
        }
    }

    fn prefix(&self) -> Option<&'static str> {
        match self {
            InferenceProfile::None => None,
            InferenceProfile::US => Some("us"),
            InferenceProfile::EU => Some("eu"),
            InferenceProfile::APAC => Some("apac"),
            InferenceProfile::Global => Some("global"),
        }
    }
}

/// Error returned when parsing an unknown inference profile name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown inference profile '{0}' (expected none, us, eu, apac or global)")]
pub struct ParseInferenceProfileError(pub String);

impl FromStr for InferenceProfile {
    type Err = ParseInferenceProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(InferenceProfile::None),
            "us" => Ok(InferenceProfile::US),
            "eu" => Ok(InferenceProfile::EU),
            "apac" => Ok(InferenceProfile::APAC),
            "global" => Ok(InferenceProfile::Global),
            _ => Err(ParseInferenceProfileError(s.to_string())),
        }
    }
}

/// Trait for models available on AWS Bedrock
pub trait BedrockModel: Model {
    /// The base Bedrock model ID, e.g. "anthropic.claude-haiku-4-5-20251001-v1:0"
    fn bedrock_id(&self) -> &'static str;

    /// Models that require cross-region inference return `Global` here.
    fn default_inference_profile(&self) -> InferenceProfile {
        InferenceProfile::None
    }
}
