//! Provider-neutral conversation types
//!
//! The agent loop and [`crate::ModelProvider`] speak these types; providers
//! translate them to and from their own SDK shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tool::ToolResult;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// A user turn carrying the results of the previous turn's tool calls
    pub fn tool_results(results: Vec<ToolResultBlock>) -> Self {
        Self {
            role: Role::User,
            content: results.into_iter().map(ContentBlock::ToolResult).collect(),
        }
    }

    /// An assistant turn with optional leading text followed by tool calls
    pub fn assistant_with_tool_use(text: impl Into<String>, tool_uses: Vec<ToolUseBlock>) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(tool_uses.len() + 1);
        if !text.is_empty() {
            content.push(ContentBlock::Text(text));
        }
        content.extend(tool_uses.into_iter().map(ContentBlock::ToolUse));
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Concatenation of every text block, ignoring tool blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                ContentBlock::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.content
            .iter()
            .filter_map(|c| match c {
                ContentBlock::ToolUse(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// True if any block is a tool result
    pub fn has_tool_results(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, ContentBlock::ToolResult(_)))
    }
}

/// Content block within a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(String),
    /// Tool call requested by the assistant
    ToolUse(ToolUseBlock),
    /// Tool output sent back by the user side
    ToolResult(ToolResultBlock),
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUseBlock {
    /// Provider-issued ID, echoed back in the matching [`ToolResultBlock`]
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Output of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultBlock {
    pub tool_use_id: String,
    pub content: ToolResult,
    pub status: ToolResultStatus,
}

impl ToolResultBlock {
    pub fn success(tool_use_id: impl Into<String>, content: ToolResult) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content,
            status: ToolResultStatus::Success,
        }
    }

    pub fn error(tool_use_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: ToolResult::Text(message.into()),
            status: ToolResultStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
}

/// A tool as advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Must match the tool's `name()`
    pub name: String,
    pub description: String,
    /// JSON Schema for the input object
    pub input_schema: Value,
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    ContentFiltered,
    StopSequence,
    #[default]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_user_creation() {
        let cases = [
            ("simple", "how many public buckets?"),
            ("empty", ""),
            ("multiline", "first\nsecond"),
        ];

        for (name, input) in cases {
            let msg = Message::user(input);
            assert_eq!(msg.role, Role::User, "case: {}", name);
            assert_eq!(msg.content.len(), 1, "case: {}", name);
            assert_eq!(msg.text(), input, "case: {}", name);
        }
    }

    #[test]
    fn test_message_text_skips_tool_blocks() {
        let msg = Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::Text("Checking ".to_string()),
                ContentBlock::ToolUse(ToolUseBlock {
                    id: "1".to_string(),
                    name: "count_public_s3_buckets".to_string(),
                    input: json!({}),
                }),
                ContentBlock::Text("now".to_string()),
            ],
        };
        assert_eq!(msg.text(), "Checking now");
    }

    #[test]
    fn test_assistant_with_tool_use_omits_empty_text() {
        let msg = Message::assistant_with_tool_use(
            "",
            vec![ToolUseBlock {
                id: "t1".to_string(),
                name: "ec2_instance_type_by_ip".to_string(),
                input: json!({"ip": "10.0.0.1"}),
            }],
        );
        assert_eq!(msg.content.len(), 1);
        assert_eq!(msg.tool_uses()[0].name, "ec2_instance_type_by_ip");
    }

    #[test]
    fn test_assistant_with_tool_use_keeps_text_first() {
        let msg = Message::assistant_with_tool_use(
            "Let me look.",
            vec![ToolUseBlock {
                id: "t1".to_string(),
                name: "describe_user_permissions".to_string(),
                input: json!({"user": "alice"}),
            }],
        );
        assert_eq!(msg.content.len(), 2);
        assert!(matches!(&msg.content[0], ContentBlock::Text(t) if t == "Let me look."));
    }

    #[test]
    fn test_tool_results_message() {
        let msg = Message::tool_results(vec![
            ToolResultBlock::success("a", ToolResult::text("3")),
            ToolResultBlock::error("b", "Tool not found: nope"),
        ]);
        assert_eq!(msg.role, Role::User);
        assert!(msg.has_tool_results());
        match &msg.content[1] {
            ContentBlock::ToolResult(r) => {
                assert_eq!(r.tool_use_id, "b");
                assert_eq!(r.status, ToolResultStatus::Error);
            }
            other => panic!("unexpected block: {:?}", other),
        }
    }

    #[test]
    fn test_stop_reason_default_is_unknown() {
        assert_eq!(StopReason::default(), StopReason::Unknown);
    }
}
