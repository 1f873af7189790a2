mod common;

use awschat_core::{Agent, AgentEvent, LoggingHook, TokenUsage};
use common::{CountBuckets, EventLog, ScriptedProvider};
use serde_json::json;

#[test]
fn test_token_usage_total() {
    let usage = TokenUsage {
        input_tokens: 1_000_000,
        output_tokens: 500_000,
    };
    assert_eq!(usage.total(), 1_500_000);
    assert_eq!(TokenUsage::default().total(), 0);
}

#[tokio::test]
async fn test_logging_hook_alongside_other_hooks() {
    let provider = ScriptedProvider::new()
        .tool("count_buckets", json!({}))
        .text("2 buckets");
    let log = EventLog::new();

    let agent = Agent::builder()
        .provider(provider)
        .add_tool(CountBuckets)
        .with_hook(LoggingHook)
        .with_hook(log.clone())
        .build()
        .await
        .unwrap();

    agent.run("count").await.unwrap();
    assert_eq!(log.names().first(), Some(&"run_started"));
    assert_eq!(log.names().last(), Some(&"run_completed"));
}

#[tokio::test]
async fn test_closure_hook_sees_tool_output() {
    use std::sync::{Arc, Mutex};

    let outputs = Arc::new(Mutex::new(Vec::new()));
    let sink = outputs.clone();

    let agent = Agent::builder()
        .provider(
            ScriptedProvider::new()
                .tool("count_buckets", json!({}))
                .text("done"),
        )
        .add_tool(CountBuckets)
        .build()
        .await
        .unwrap();
    agent.add_hook(move |event: &AgentEvent| {
        if let AgentEvent::ToolCompleted { output, .. } = event {
            sink.lock().unwrap().push(output.as_text());
        }
    });

    agent.run("count").await.unwrap();
    assert_eq!(*outputs.lock().unwrap(), vec!["2".to_string()]);
}
