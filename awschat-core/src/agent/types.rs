//! Agent-related types

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::provider::ProviderError;

/// Default cap on model calls within a single [`crate::Agent::run`]
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// Errors that end an agent run.
///
/// Tool failures are not in this list: they are reported to the model as
/// error tool results and the run continues.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Model returned no text response")]
    NoResponse,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Response exceeded maximum token limit. Try asking a narrower question.")]
    MaxTokensExceeded,

    #[error("Response was filtered by content moderation")]
    ContentFiltered,

    #[error("Model did not finish within {0} calls")]
    MaxIterationsExceeded(usize),

    #[error("Unexpected stop reason: {0}")]
    UnexpectedStopReason(String),
}

/// Name and description of a registered tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Result of a successful [`crate::Agent::run`]
///
/// Displays as the response text.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub text: String,
    /// Every tool call made during the run, in execution order
    pub tool_calls: Vec<ToolCallInfo>,
    pub token_usage: Option<TokenUsageStats>,
    pub duration: Duration,
    pub model_calls: usize,
}

impl AgentResponse {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for AgentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<AgentResponse> for String {
    fn from(response: AgentResponse) -> Self {
        response.text
    }
}

impl PartialEq<&str> for AgentResponse {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

#[derive(Debug, Clone)]
pub struct ToolCallInfo {
    pub name: String,
    pub input: Value,
    pub output: String,
    pub success: bool,
    pub duration: Duration,
}

/// Token totals across all model calls of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsageStats {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsageStats {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
