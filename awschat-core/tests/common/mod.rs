//! Fixtures shared across integration tests.
#![allow(dead_code)]

use awschat_core::{
    AgentEvent, AgentHook, Message, ModelProvider, ModelResponse, ProviderError, StopReason, Tool,
    ToolDefinition, ToolError, ToolResult, ToolUseBlock,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

// ===== Test Tools =====

/// Always answers "2"
pub struct CountBuckets;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoInput {}

impl Tool for CountBuckets {
    type Input = NoInput;

    fn name(&self) -> &str {
        "count_buckets"
    }

    fn description(&self) -> &str {
        "Count buckets"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::text("2"))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserInput {
    pub username: String,
}

pub struct LookupUser;

impl Tool for LookupUser {
    type Input = UserInput;

    fn name(&self) -> &str {
        "lookup_user"
    }

    fn description(&self) -> &str {
        "Look up a user"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::text(format!("User {} has no policies.", input.username)))
    }
}

pub struct FailingTool;

impl Tool for FailingTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "failing_tool"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        Err(ToolError::Custom("backend exploded".to_string()))
    }
}

// ===== Hooks =====

#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<AgentEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| match e {
                AgentEvent::RunStarted { .. } => "run_started",
                AgentEvent::RunCompleted { .. } => "run_completed",
                AgentEvent::RunFailed { .. } => "run_failed",
                AgentEvent::ModelCallStarted { .. } => "model_call_started",
                AgentEvent::ModelCallCompleted { .. } => "model_call_completed",
                AgentEvent::ToolRequested { .. } => "tool_requested",
                AgentEvent::ToolExecuting { .. } => "tool_executing",
                AgentEvent::ToolCompleted { .. } => "tool_completed",
                AgentEvent::ToolFailed { .. } => "tool_failed",
            })
            .collect()
    }
}

impl AgentHook for EventLog {
    fn on_event(&self, event: &AgentEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ===== Provider =====

/// Replays queued responses and remembers what it was sent.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<Vec<Result<ModelResponse, ProviderError>>>>,
    seen: Arc<Mutex<Vec<Vec<Message>>>>,
    next_id: Arc<Mutex<usize>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, text: &str) -> Self {
        self.push(Message::assistant(text), StopReason::EndTurn)
    }

    pub fn tool(self, name: &str, input: serde_json::Value) -> Self {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("tu_{}", next)
        };
        let message = Message::assistant_with_tool_use(
            "",
            vec![ToolUseBlock {
                id,
                name: name.to_string(),
                input,
            }],
        );
        self.push(message, StopReason::ToolUse)
    }

    pub fn stop(self, stop_reason: StopReason) -> Self {
        self.push(Message::assistant("partial"), stop_reason)
    }

    /// Queue a provider failure
    pub fn fail(self, error: ProviderError) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    fn push(self, message: Message, stop_reason: StopReason) -> Self {
        self.responses.lock().unwrap().push(Ok(ModelResponse {
            message,
            stop_reason,
            usage: None,
        }));
        self
    }

    /// Messages sent on each call, in call order
    pub fn seen(&self) -> Vec<Vec<Message>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "ScriptedProvider"
    }

    fn max_context_tokens(&self) -> usize {
        100_000
    }

    fn max_output_tokens(&self) -> usize {
        4_096
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        _tools: Vec<ToolDefinition>,
        _system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        self.seen.lock().unwrap().push(messages);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::Other("script exhausted".to_string()));
        }
        responses.remove(0)
    }
}
