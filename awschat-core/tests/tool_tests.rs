use awschat_core::{box_tool, box_tools, format_call_plain, Tool, ToolError, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, JsonSchema)]
struct BucketInput {
    /// Name of the bucket
    bucket: String,
}

struct EchoBucket;

impl Tool for EchoBucket {
    type Input = BucketInput;

    fn name(&self) -> &str {
        "echo_bucket"
    }

    fn description(&self) -> &str {
        "Echo the bucket name"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        if input.bucket.is_empty() {
            return Err("bucket must not be empty".into());
        }
        Ok(ToolResult::text(input.bucket))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct Empty {}

struct Ping;

impl Tool for Ping {
    type Input = Empty;

    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Answer pong"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok("pong".into())
    }
}

// ===== Schema Tests =====

#[test]
fn test_input_schema_lists_required_fields() {
    let schema = EchoBucket.input_schema();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["bucket"]["type"], "string");
    assert_eq!(schema["required"], json!(["bucket"]));
}

#[test]
fn test_empty_input_schema_is_object() {
    let schema = Ping.input_schema();
    assert_eq!(schema["type"], "object");
}

// ===== Dynamic Dispatch Tests =====

#[tokio::test]
async fn test_execute_raw_deserializes_input() {
    let tool = box_tool(EchoBucket);
    let result = tool.execute_raw(json!({"bucket": "logs"})).await.unwrap();
    assert_eq!(result, ToolResult::text("logs"));
}

#[tokio::test]
async fn test_execute_raw_rejects_bad_input() {
    let tool = box_tool(EchoBucket);
    let err = tool.execute_raw(json!({"name": "logs"})).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput(_)));
    assert!(err.to_string().contains("missing field `bucket`"));
}

#[tokio::test]
async fn test_execute_raw_passes_tool_errors_through() {
    let tool = box_tool(EchoBucket);
    let err = tool.execute_raw(json!({"bucket": ""})).await.unwrap_err();
    assert_eq!(err.to_string(), "bucket must not be empty");
}

#[tokio::test]
async fn test_box_tools_macro_keeps_order() {
    let tools = box_tools![Ping, EchoBucket];
    let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["ping", "echo_bucket"]);

    let result = tools[0].execute_raw(json!({})).await.unwrap();
    assert_eq!(result.as_str(), Some("pong"));
}

// ===== ToolResult / ToolError Tests =====

#[test]
fn test_tool_result_json() {
    #[derive(serde::Serialize)]
    struct Keys {
        keys: Vec<&'static str>,
    }

    let result = ToolResult::json(Keys { keys: vec!["a.txt"] }).unwrap();
    assert_eq!(result.as_text(), r#"{"keys":["a.txt"]}"#);
    assert_eq!(result.as_str(), None);
}

#[test]
fn test_tool_error_conversions() {
    let from_string: ToolError = String::from("boom").into();
    assert!(matches!(from_string, ToolError::Custom(_)));
    assert_eq!(from_string.to_string(), "boom");

    let invalid = ToolError::InvalidInput("bad".to_string());
    assert_eq!(invalid.to_string(), "Invalid input: bad");
}

#[test]
fn test_format_call_plain() {
    assert_eq!(
        format_call_plain("count_public_s3_buckets", &json!({})),
        "count_public_s3_buckets()"
    );
    assert_eq!(
        format_call_plain("describe_bucket_contents", &json!({"bucket": "logs"})),
        r#"describe_bucket_contents(bucket="logs")"#
    );
}
