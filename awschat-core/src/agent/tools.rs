//! Tool lookup and execution for Agent

use std::time::Instant;

use serde_json::Value;

use crate::events::AgentEvent;
use crate::tool::ToolResult;
use crate::types::{Message, ToolResultBlock, ToolUseBlock};

use super::types::{ToolCallInfo, ToolInfo};
use super::Agent;

/// Why a requested tool call produced no result
#[derive(Debug, thiserror::Error)]
enum ToolCallError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool input must be a JSON object, got: {0}")]
    NotAnObject(&'static str),

    #[error("{0}")]
    Failed(#[from] crate::tool::ToolError),
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Agent {
    /// Registered tools in registration order
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    async fn execute_tool(&self, tool_use: &ToolUseBlock) -> Result<ToolResult, ToolCallError> {
        let tool_start = Instant::now();

        self.emit_event(AgentEvent::ToolRequested {
            tool_use_id: tool_use.id.clone(),
            name: tool_use.name.clone(),
            input: tool_use.input.clone(),
        });

        let outcome = match self.tools.iter().find(|t| t.name() == tool_use.name) {
            None => Err(ToolCallError::NotFound(tool_use.name.clone())),
            Some(_) if !tool_use.input.is_object() => {
                Err(ToolCallError::NotAnObject(json_type_name(&tool_use.input)))
            }
            Some(tool) => {
                self.emit_event(AgentEvent::ToolExecuting {
                    tool_use_id: tool_use.id.clone(),
                    name: tool_use.name.clone(),
                });
                tool.execute_raw(tool_use.input.clone())
                    .await
                    .map_err(ToolCallError::from)
            }
        };

        match &outcome {
            Ok(result) => self.emit_event(AgentEvent::ToolCompleted {
                tool_use_id: tool_use.id.clone(),
                name: tool_use.name.clone(),
                output: result.clone(),
                duration: tool_start.elapsed(),
            }),
            Err(e) => self.emit_event(AgentEvent::ToolFailed {
                tool_use_id: tool_use.id.clone(),
                name: tool_use.name.clone(),
                error: e.to_string(),
                duration: tool_start.elapsed(),
            }),
        }

        outcome
    }

    /// Execute every tool call in `message`, one at a time in request order.
    pub(super) async fn process_tool_calls(
        &self,
        message: &Message,
        tool_call_infos: &mut Vec<ToolCallInfo>,
    ) -> Vec<ToolResultBlock> {
        let mut results = Vec::new();

        for tool_use in message.tool_uses() {
            let start = Instant::now();
            let outcome = self.execute_tool(tool_use).await;
            let duration = start.elapsed();

            let block = match outcome {
                Ok(result) => {
                    tool_call_infos.push(ToolCallInfo {
                        name: tool_use.name.clone(),
                        input: tool_use.input.clone(),
                        output: result.as_text(),
                        success: true,
                        duration,
                    });
                    ToolResultBlock::success(tool_use.id.clone(), result)
                }
                Err(e) => {
                    let error_msg = format!("Error: {}", e);
                    tool_call_infos.push(ToolCallInfo {
                        name: tool_use.name.clone(),
                        input: tool_use.input.clone(),
                        output: error_msg.clone(),
                        success: false,
                        duration,
                    });
                    ToolResultBlock::error(tool_use.id.clone(), error_msg)
                }
            };
            results.push(block);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_type_name() {
        let cases = [
            (Value::Null, "null"),
            (serde_json::json!(true), "boolean"),
            (serde_json::json!(1), "number"),
            (serde_json::json!("x"), "string"),
            (serde_json::json!([]), "array"),
            (serde_json::json!({}), "object"),
        ];
        for (value, expected) in cases {
            assert_eq!(json_type_name(&value), expected);
        }
    }

    #[test]
    fn test_tool_call_error_messages() {
        assert_eq!(
            ToolCallError::NotFound("nope".to_string()).to_string(),
            "Tool not found: nope"
        );
        assert_eq!(
            ToolCallError::NotAnObject("string").to_string(),
            "Tool input must be a JSON object, got: string"
        );
    }
}
