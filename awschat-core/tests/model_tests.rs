use awschat_core::{
    BedrockModel, ClaudeHaiku4_5, ClaudeSonnet4_5, ContentBlock, InferenceProfile, Message, Model,
    NovaLite, NovaPro, Role, ToolResult, ToolResultBlock, ToolResultStatus, ToolUseBlock,
};

// ===== Token Estimation Tests =====

#[test]
fn test_estimate_token_count_basic() {
    let model = ClaudeHaiku4_5;

    assert_eq!(model.estimate_token_count(""), 0);
    assert_eq!(model.estimate_token_count("test"), 1);
    assert_eq!(model.estimate_token_count("testtest"), 2);
    assert_eq!(model.estimate_token_count("tests"), 2);
    assert_eq!(model.estimate_token_count(&"x".repeat(100)), 25);
}

#[test]
fn test_estimate_message_tokens_multiple_messages() {
    let model = ClaudeHaiku4_5;

    let messages = vec![
        Message::user("Hello"),       // 2 + 4
        Message::assistant("Hi"),     // 1 + 4
        Message::user("How are you"), // 3 + 4
    ];

    assert_eq!(model.estimate_message_tokens(&messages), 18);
    assert_eq!(model.estimate_message_tokens(&[]), 0);
}

#[test]
fn test_estimate_tool_use_block() {
    let model = ClaudeHaiku4_5;

    let block = ContentBlock::ToolUse(ToolUseBlock {
        id: "tu_1".to_string(),
        name: "describe_bucket_contents".to_string(),
        input: serde_json::json!({"bucket": "logs"}),
    });

    // name 6 + id 1 + input 5 + overhead 10
    assert_eq!(model.estimate_content_block_tokens(&block), 22);
}

#[test]
fn test_estimate_tool_result_blocks() {
    let model = ClaudeHaiku4_5;

    let text = ContentBlock::ToolResult(ToolResultBlock {
        tool_use_id: "tu_1".to_string(),
        content: ToolResult::Text("Instance not found".to_string()),
        status: ToolResultStatus::Success,
    });
    // id 1 + body 5 + overhead 10
    assert_eq!(model.estimate_content_block_tokens(&text), 16);

    let json = ContentBlock::ToolResult(ToolResultBlock {
        tool_use_id: "tu_2".to_string(),
        content: ToolResult::Json(serde_json::json!({"keys": ["a.txt", "b.txt"]})),
        status: ToolResultStatus::Success,
    });
    assert!(model.estimate_content_block_tokens(&json) > 10);
}

#[test]
fn test_estimate_mixed_assistant_message() {
    let model = ClaudeHaiku4_5;

    let message = Message {
        role: Role::Assistant,
        content: vec![
            ContentBlock::Text("Let me check.".to_string()),
            ContentBlock::ToolUse(ToolUseBlock {
                id: "t1".to_string(),
                name: "count_public_s3_buckets".to_string(),
                input: serde_json::json!({}),
            }),
        ],
    };

    // overhead 4 + text 4 + (name 6 + id 1 + "{}" 1 + 10)
    assert_eq!(model.estimate_message_tokens(&[message]), 26);
}

// ===== Model Metadata Tests =====

#[test]
fn test_bedrock_ids_and_profiles() {
    let cases: Vec<(&dyn BedrockModel, &str, InferenceProfile)> = vec![
        (
            &ClaudeHaiku4_5,
            "anthropic.claude-haiku-4-5-20251001-v1:0",
            InferenceProfile::Global,
        ),
        (
            &ClaudeSonnet4_5,
            "anthropic.claude-sonnet-4-5-20250929-v1:0",
            InferenceProfile::Global,
        ),
        (&NovaLite, "amazon.nova-lite-v1:0", InferenceProfile::None),
        (&NovaPro, "amazon.nova-pro-v1:0", InferenceProfile::None),
    ];

    for (model, id, profile) in cases {
        assert_eq!(model.bedrock_id(), id, "{}", model.name());
        assert_eq!(model.default_inference_profile(), profile, "{}", model.name());
    }
}

#[test]
fn test_inference_profile_round_trip_through_model_id() {
    let id = ClaudeHaiku4_5.bedrock_id();
    let profile: InferenceProfile = "US".parse().unwrap();
    assert_eq!(profile.apply_to(id), format!("us.{}", id));
    assert!("mars".parse::<InferenceProfile>().is_err());
}
