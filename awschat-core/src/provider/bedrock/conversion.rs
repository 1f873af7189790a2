//! Conversions between conversation types and Bedrock Converse types

use super::ProviderError;
use crate::tool::ToolResult;
use crate::types::{
    ContentBlock, Message, Role, StopReason, ToolDefinition, ToolResultStatus, ToolUseBlock,
};
use aws_sdk_bedrockruntime::types::{
    ContentBlock as BedrockContentBlock, ConversationRole, Message as BedrockMessage,
    StopReason as BedrockStopReason, Tool as BedrockTool, ToolInputSchema,
    ToolResultBlock as BedrockToolResultBlock, ToolResultContentBlock,
    ToolResultStatus as BedrockToolResultStatus, ToolSpecification,
    ToolUseBlock as BedrockToolUseBlock,
};
use aws_smithy_types::{Document, Number};

fn build_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Configuration(e.to_string())
}

pub fn to_bedrock_message(msg: &Message) -> Result<BedrockMessage, ProviderError> {
    let role = match msg.role {
        Role::User => ConversationRole::User,
        Role::Assistant => ConversationRole::Assistant,
    };

    // Converse rejects blank text blocks.
    let content: Vec<BedrockContentBlock> = msg
        .content
        .iter()
        .filter(|block| !matches!(block, ContentBlock::Text(t) if t.trim().is_empty()))
        .map(to_bedrock_content_block)
        .collect::<Result<Vec<_>, _>>()?;
    if content.is_empty() {
        return Err(ProviderError::Configuration(format!(
            "{:?} message has no content to send",
            msg.role
        )));
    }

    BedrockMessage::builder()
        .role(role)
        .set_content(Some(content))
        .build()
        .map_err(build_error)
}

fn to_bedrock_content_block(block: &ContentBlock) -> Result<BedrockContentBlock, ProviderError> {
    match block {
        ContentBlock::Text(text) => Ok(BedrockContentBlock::Text(text.clone())),
        ContentBlock::ToolUse(tool_use) => {
            let block = BedrockToolUseBlock::builder()
                .tool_use_id(&tool_use.id)
                .name(&tool_use.name)
                .input(json_to_document(&tool_use.input))
                .build()
                .map_err(build_error)?;
            Ok(BedrockContentBlock::ToolUse(block))
        }
        ContentBlock::ToolResult(result) => {
            let content = match &result.content {
                ToolResult::Text(text) => ToolResultContentBlock::Text(text.clone()),
                ToolResult::Json(json) => ToolResultContentBlock::Json(json_to_document(json)),
            };
            let status = match result.status {
                ToolResultStatus::Success => BedrockToolResultStatus::Success,
                ToolResultStatus::Error => BedrockToolResultStatus::Error,
            };
            let block = BedrockToolResultBlock::builder()
                .tool_use_id(&result.tool_use_id)
                .content(content)
                .status(status)
                .build()
                .map_err(build_error)?;
            Ok(BedrockContentBlock::ToolResult(block))
        }
    }
}

pub fn to_bedrock_tool(tool: &ToolDefinition) -> Result<BedrockTool, ProviderError> {
    let spec = ToolSpecification::builder()
        .name(&tool.name)
        .description(&tool.description)
        .input_schema(ToolInputSchema::Json(json_to_document(&tool.input_schema)))
        .build()
        .map_err(build_error)?;
    Ok(BedrockTool::ToolSpec(spec))
}

pub fn json_to_document(value: &serde_json::Value) -> Document {
    match value {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else if let Some(f) = n.as_f64() {
                Document::Number(Number::Float(f))
            } else {
                Document::Null
            }
        }
        serde_json::Value::String(s) => Document::String(s.clone()),
        serde_json::Value::Array(arr) => {
            Document::Array(arr.iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(obj) => Document::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), json_to_document(v)))
                .collect(),
        ),
    }
}

pub fn from_bedrock_message(msg: &BedrockMessage) -> Message {
    let role = match msg.role() {
        ConversationRole::User => Role::User,
        _ => Role::Assistant,
    };

    let content: Vec<ContentBlock> = msg
        .content()
        .iter()
        .filter_map(from_bedrock_content_block)
        .collect();

    Message { role, content }
}

fn from_bedrock_content_block(block: &BedrockContentBlock) -> Option<ContentBlock> {
    match block {
        BedrockContentBlock::Text(text) => Some(ContentBlock::Text(text.clone())),
        BedrockContentBlock::ToolUse(tool_use) => Some(ContentBlock::ToolUse(ToolUseBlock {
            id: tool_use.tool_use_id().to_string(),
            name: tool_use.name().to_string(),
            input: document_to_json(tool_use.input()),
        })),
        // Reasoning and media blocks carry nothing the agent loop uses.
        _ => None,
    }
}

pub fn document_to_json(doc: &Document) -> serde_json::Value {
    match doc {
        Document::Null => serde_json::Value::Null,
        Document::Bool(b) => serde_json::Value::Bool(*b),
        Document::Number(n) => match n {
            Number::PosInt(i) => serde_json::json!(*i),
            Number::NegInt(i) => serde_json::json!(*i),
            Number::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        },
        Document::String(s) => serde_json::Value::String(s.clone()),
        Document::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(document_to_json).collect())
        }
        Document::Object(obj) => serde_json::Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect(),
        ),
    }
}

pub fn from_bedrock_stop_reason(reason: &BedrockStopReason) -> StopReason {
    match reason {
        BedrockStopReason::EndTurn => StopReason::EndTurn,
        BedrockStopReason::ToolUse => StopReason::ToolUse,
        BedrockStopReason::MaxTokens => StopReason::MaxTokens,
        BedrockStopReason::ContentFiltered | BedrockStopReason::GuardrailIntervened => {
            StopReason::ContentFiltered
        }
        BedrockStopReason::StopSequence => StopReason::StopSequence,
        _ => StopReason::Unknown,
    }
}
