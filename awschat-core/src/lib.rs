//! # awschat-core
//!
//! Agent runtime for the AWS chatbot: a tool-using conversational loop over
//! Amazon Bedrock.
//!
//! ```ignore
//! use awschat_core::{Agent, ClaudeHaiku4_5};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> awschat_core::Result<()> {
//!     let agent = Agent::builder()
//!         .bedrock(ClaudeHaiku4_5)
//!         .with_system_prompt("You answer questions about an AWS account.")
//!         .build()
//!         .await?;
//!
//!     let response = agent.run("How many S3 buckets are public?").await?;
//!     println!("{}", response);
//!     Ok(())
//! }
//! ```
//!
//! ## Tools
//!
//! Implement [`Tool`] with a `schemars`-derived input type; the schema the
//! model sees is generated from it.
//!
//! ```ignore
//! use awschat_core::{Tool, ToolError, ToolResult};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct BucketInput {
//!     /// Bucket name
//!     bucket: String,
//! }
//!
//! struct DescribeBucket;
//!
//! impl Tool for DescribeBucket {
//!     type Input = BucketInput;
//!
//!     fn name(&self) -> &str { "describe_bucket" }
//!     fn description(&self) -> &str { "Describe one bucket" }
//!
//!     async fn execute(&self, input: BucketInput) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::text(format!("{} exists", input.bucket)))
//!     }
//! }
//! ```
//!
//! Heterogeneous tools are added together with [`box_tools!`].
//!
//! ## Feature Flags
//!
//! - `bedrock` - Amazon Bedrock provider (enabled by default)
//! - `test-utils` - [`test_utils::MockProvider`] and [`test_utils::EventCollector`]

pub mod agent;
pub mod conversation;
pub mod error;
pub mod events;
pub mod model;
pub mod models;
pub mod provider;
pub mod tool;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use agent::{
    Agent, AgentBuilder, AgentError, AgentResponse, TokenUsageStats, ToolCallInfo, ToolInfo,
    DEFAULT_MAX_ITERATIONS,
};
pub use conversation::{
    BoxedConversationManager, ContextLimits, ConversationManager, SimpleConversationManager,
    SlidingWindowConversationManager, TokenEstimator,
};
pub use error::{error_chain_messages, Error, Result};
pub use events::{AgentEvent, AgentHook, LoggingHook, TokenUsage};
pub use model::{
    BedrockModel, InferenceProfile, Model, ModelResponse, ParseInferenceProfileError,
};
pub use provider::{ModelProvider, ProviderError};

#[cfg(feature = "bedrock")]
pub use provider::BedrockProvider;

pub use models::{ClaudeHaiku4_5, ClaudeSonnet4_5, NovaLite, NovaMicro, NovaPro};

pub use tool::{box_tool, format_call_plain, DynTool, Tool, ToolError, ToolResult};
pub use types::{
    ContentBlock, Message, Role, StopReason, ToolDefinition, ToolResultBlock, ToolResultStatus,
    ToolUseBlock,
};
