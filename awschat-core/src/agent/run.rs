//! The agentic loop

use std::time::Instant;

use crate::events::AgentEvent;
use crate::types::{Message, StopReason, ToolDefinition};

use super::helpers::extract_text_response;
use super::types::{AgentError, AgentResponse, TokenUsageStats, ToolCallInfo};
use super::Agent;

impl Agent {
    /// Run one user request to completion.
    ///
    /// The user message is added to the conversation, then the model is
    /// called repeatedly: each `ToolUse` turn executes the requested tools
    /// and sends their results back, until the model ends its turn. At most
    /// `max_iterations` model calls are made.
    ///
    /// Tool problems never end the run; they are returned to the model as
    /// error results. Provider failures and truncated, filtered or blank
    /// responses do end it, and every message the failed run added is
    /// removed again so the next run starts from a well-formed history.
    pub async fn run(&self, user_message: &str) -> Result<AgentResponse, AgentError> {
        let run_start = Instant::now();
        self.emit_event(AgentEvent::RunStarted {
            input: user_message.to_string(),
            timestamp: run_start,
        });

        let history_len = self.message_count();
        let result = self.run_loop(user_message, run_start).await;
        if result.is_err() {
            self.conversation_manager.write().truncate(history_len);
        }

        match &result {
            Ok(response) => self.emit_event(AgentEvent::RunCompleted {
                output: response.text.clone(),
                duration: response.duration,
            }),
            Err(e) => self.emit_event(AgentEvent::RunFailed {
                error: e.to_string(),
                duration: run_start.elapsed(),
            }),
        }

        result
    }

    async fn run_loop(
        &self,
        user_message: &str,
        run_start: Instant,
    ) -> Result<AgentResponse, AgentError> {
        let mut tool_call_infos: Vec<ToolCallInfo> = Vec::new();
        let mut usage = TokenUsageStats::default();
        let mut model_call_count: usize = 0;

        self.conversation_manager
            .write()
            .add_message(Message::user(user_message));

        let tool_defs: Vec<ToolDefinition> = self
            .tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();

        while model_call_count < self.max_iterations {
            let context_messages = self.context_messages();

            let model_call_start = Instant::now();
            self.emit_event(AgentEvent::ModelCallStarted {
                message_count: context_messages.len(),
                tool_count: tool_defs.len(),
                timestamp: model_call_start,
            });

            let response = self
                .provider
                .generate(
                    context_messages,
                    tool_defs.clone(),
                    self.system_prompt.clone(),
                )
                .await?;

            model_call_count += 1;
            if let Some(tokens) = response.usage {
                usage.input_tokens += tokens.input_tokens;
                usage.output_tokens += tokens.output_tokens;
            }

            self.emit_event(AgentEvent::ModelCallCompleted {
                response_content: response.message.text(),
                tokens: response.usage,
                duration: model_call_start.elapsed(),
                stop_reason: Some(response.stop_reason),
            });

            self.conversation_manager
                .write()
                .add_message(response.message.clone());

            match response.stop_reason {
                StopReason::ToolUse => {
                    let tool_results = self
                        .process_tool_calls(&response.message, &mut tool_call_infos)
                        .await;
                    self.conversation_manager
                        .write()
                        .add_message(Message::tool_results(tool_results));
                }
                StopReason::EndTurn | StopReason::StopSequence => {
                    let text =
                        extract_text_response(&response.message).ok_or(AgentError::NoResponse)?;
                    if text.trim().is_empty() {
                        return Err(AgentError::EmptyResponse);
                    }
                    let token_usage = (usage.total() > 0).then_some(usage);

                    return Ok(AgentResponse {
                        text,
                        tool_calls: tool_call_infos,
                        token_usage,
                        duration: run_start.elapsed(),
                        model_calls: model_call_count,
                    });
                }
                StopReason::MaxTokens => return Err(AgentError::MaxTokensExceeded),
                StopReason::ContentFiltered => return Err(AgentError::ContentFiltered),
                StopReason::Unknown => {
                    return Err(AgentError::UnexpectedStopReason("Unknown".to_string()))
                }
            }
        }

        Err(AgentError::MaxIterationsExceeded(self.max_iterations))
    }
}
