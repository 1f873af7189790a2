//! Scripted provider and event recorder for tests
//!
//! Enabled with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! awschat-core = { path = "../awschat-core", features = ["test-utils"] }
//! ```
//!
//! ```rust
//! use awschat_core::{Agent, test_utils::MockProvider};
//!
//! # async fn example() -> awschat_core::Result<()> {
//! let provider = MockProvider::new().with_text("You have 2 public buckets.");
//!
//! let agent = Agent::builder().provider(provider).build().await?;
//! let response = agent.run("How many public buckets?").await?;
//! assert_eq!(response.text(), "You have 2 public buckets.");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::events::{AgentEvent, AgentHook, TokenUsage};
use crate::model::ModelResponse;
use crate::provider::{ModelProvider, ProviderError};
use crate::types::{Message, StopReason, ToolDefinition, ToolUseBlock};

/// One call made to a [`MockProvider`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub system_prompt: Option<String>,
}

/// Provider that replays queued responses in order.
///
/// Once the queue is empty every call fails with `ProviderError::Other`.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<ModelResponse, ProviderError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a final answer (`StopReason::EndTurn`).
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(ModelResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: None,
        })
    }

    /// Queue a single tool call (`StopReason::ToolUse`).
    pub fn with_tool_use(self, tool_name: impl Into<String>, tool_input: Value) -> Self {
        self.with_tool_uses(vec![(tool_name.into(), tool_input)])
    }

    /// Queue one assistant turn requesting several tools at once.
    pub fn with_tool_uses(self, calls: Vec<(String, Value)>) -> Self {
        let tool_uses = calls
            .into_iter()
            .map(|(name, input)| ToolUseBlock {
                id: format!("tooluse_{}", uuid::Uuid::new_v4().simple()),
                name,
                input,
            })
            .collect();

        self.with_response(ModelResponse {
            message: Message::assistant_with_tool_use("", tool_uses),
            stop_reason: StopReason::ToolUse,
            usage: None,
        })
    }

    /// Queue a response with an arbitrary stop reason.
    pub fn with_stop_reason(self, text: impl Into<String>, stop_reason: StopReason) -> Self {
        self.with_response(ModelResponse {
            message: Message::assistant(text),
            stop_reason,
            usage: None,
        })
    }

    /// Queue a provider failure.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.responses.lock().push(Err(error));
        self
    }

    pub fn with_response(self, response: ModelResponse) -> Self {
        self.responses.lock().push(Ok(response));
        self
    }

    /// Attach token usage to the most recently queued response.
    pub fn with_usage(self, input_tokens: usize, output_tokens: usize) -> Self {
        if let Some(Ok(last)) = self.responses.lock().last_mut() {
            last.usage = Some(TokenUsage {
                input_tokens,
                output_tokens,
            });
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    fn max_context_tokens(&self) -> usize {
        200_000
    }

    fn max_output_tokens(&self) -> usize {
        8_192
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        self.calls.lock().push(RecordedCall {
            messages,
            tools,
            system_prompt,
        });

        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(ProviderError::Other(
                "MockProvider: no more responses queued".to_string(),
            ));
        }
        responses.remove(0)
    }
}

/// Hook that records every event it sees.
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<AgentEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().clone()
    }

    /// Snake-case names of the recorded events, in order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(event_type_name).collect()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| event_type_name(e) == event_type)
    }

    pub fn count_event(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| event_type_name(e) == event_type)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

fn event_type_name(event: &AgentEvent) -> &'static str {
    match event {
        AgentEvent::RunStarted { .. } => "run_started",
        AgentEvent::RunCompleted { .. } => "run_completed",
        AgentEvent::RunFailed { .. } => "run_failed",
        AgentEvent::ModelCallStarted { .. } => "model_call_started",
        AgentEvent::ModelCallCompleted { .. } => "model_call_completed",
        AgentEvent::ToolRequested { .. } => "tool_requested",
        AgentEvent::ToolExecuting { .. } => "tool_executing",
        AgentEvent::ToolCompleted { .. } => "tool_completed",
        AgentEvent::ToolFailed { .. } => "tool_failed",
    }
}

impl AgentHook for EventCollector {
    fn on_event(&self, event: &AgentEvent) {
        self.events.lock().push(event.clone());
    }
}
