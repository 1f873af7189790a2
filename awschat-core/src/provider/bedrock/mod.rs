//! AWS Bedrock provider over the Converse API

mod conversion;

use super::{ModelProvider, ProviderError};
use crate::error::error_chain_messages;
use crate::events::TokenUsage;
use crate::model::{BedrockModel, InferenceProfile, ModelResponse};
use crate::types::{Message, ToolDefinition};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::{
    operation::converse::ConverseOutput,
    types::{
        InferenceConfiguration, Message as BedrockMessage, SystemContentBlock,
        Tool as BedrockTool, ToolConfiguration,
    },
    Client,
};
use conversion::{from_bedrock_message, from_bedrock_stop_reason, to_bedrock_message, to_bedrock_tool};
use std::error::Error as StdError;
use std::sync::Arc;

fn classify_aws_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: StdError + 'static,
    R: std::fmt::Debug,
{
    let messages = error_chain_messages(&err);

    // The innermost message is usually the most specific.
    let root_message = messages
        .last()
        .cloned()
        .unwrap_or_else(|| "Unknown error".to_string());

    classify_error_message(&messages.join(" "), root_message)
}

/// Map Bedrock exception names and messages to a [`ProviderError`] variant.
///
/// See <https://docs.aws.amazon.com/bedrock/latest/APIReference/API_runtime_Converse.html>
fn classify_error_message(combined: &str, root_message: String) -> ProviderError {
    let lower = combined.to_lowercase();

    if lower.contains("unauthorized")
        || lower.contains("security token")
        || lower.contains("session token")
        || lower.contains("access denied")
        || lower.contains("accessdeniedexception")
        || lower.contains("expired token")
        || lower.contains("credentials")
    {
        ProviderError::Authentication(root_message)
    } else if lower.contains("throttl")
        || lower.contains("too many requests")
        || lower.contains("rate exceeded")
        || lower.contains("limit exceeded")
    {
        ProviderError::RateLimited(root_message)
    } else if lower.contains("serviceunavailable")
        || lower.contains("service unavailable")
        || lower.contains("temporarily unavailable")
        || lower.contains("internalserver")
        || lower.contains("internal server error")
    {
        ProviderError::ServiceUnavailable(root_message)
    } else if lower.contains("content filtered")
        || lower.contains("context length")
        || lower.contains("too many tokens")
    {
        ProviderError::Model(root_message)
    } else if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("connection")
        || lower.contains("network")
        || lower.contains("dns")
    {
        ProviderError::Network(root_message)
    } else if lower.contains("validation")
        || lower.contains("resourcenotfound")
        || lower.contains("not found")
        || lower.contains("modelnotready")
        || lower.contains("model identifier")
    {
        ProviderError::Configuration(root_message)
    } else {
        ProviderError::Other(root_message)
    }
}

const DEFAULT_MAX_TOKENS: i32 = 4096;

/// Limits assumed for a model given only by ID
const CUSTOM_MODEL_CONTEXT_TOKENS: usize = 128_000;
const CUSTOM_MODEL_OUTPUT_TOKENS: usize = 4_096;

struct ConverseRequest {
    model_id: String,
    messages: Vec<BedrockMessage>,
    max_tokens: i32,
    temperature: Option<f32>,
    top_p: Option<f32>,
    system_prompt: Option<String>,
    tools: Vec<BedrockTool>,
}

/// Seam over the Bedrock client so the provider can be tested without AWS.
#[async_trait::async_trait]
trait BedrockClient: Send + Sync {
    async fn converse(&self, request: ConverseRequest) -> Result<ConverseOutput, ProviderError>;
}

struct SdkBedrockClient {
    client: Client,
}

#[async_trait::async_trait]
impl BedrockClient for SdkBedrockClient {
    async fn converse(&self, req: ConverseRequest) -> Result<ConverseOutput, ProviderError> {
        let mut request = self
            .client
            .converse()
            .model_id(req.model_id)
            .set_messages(Some(req.messages))
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(req.max_tokens)
                    .set_temperature(req.temperature)
                    .set_top_p(req.top_p)
                    .build(),
            );

        if let Some(prompt) = req.system_prompt {
            request = request.system(SystemContentBlock::Text(prompt));
        }

        if !req.tools.is_empty() {
            request = request.tool_config(
                ToolConfiguration::builder()
                    .set_tools(Some(req.tools))
                    .build()
                    .map_err(|e| ProviderError::Configuration(e.to_string()))?,
            );
        }

        request.send().await.map_err(classify_aws_error)
    }
}

/// Bedrock model provider
///
/// ```ignore
/// let provider = BedrockProvider::new(ClaudeHaiku4_5)
///     .await?
///     .with_temperature(0.0);
/// ```
#[derive(Clone)]
pub struct BedrockProvider {
    client: Arc<dyn BedrockClient>,
    base_model_id: String,
    inference_profile: InferenceProfile,
    model_name: String,
    max_context_tokens: usize,
    max_output_tokens: usize,
    max_tokens: i32,
    temperature: Option<f32>,
    top_p: Option<f32>,
}

impl BedrockProvider {
    /// Create a provider for a predefined model using the default AWS
    /// credential and region chain.
    pub async fn new(model: impl BedrockModel) -> Result<Self, ProviderError> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Ok(Self::from_sdk_config(&sdk_config, model))
    }

    /// Create a provider for a predefined model from an already loaded config.
    pub fn from_sdk_config(sdk_config: &SdkConfig, model: impl BedrockModel) -> Self {
        Self::with_bedrock_client(
            Arc::new(SdkBedrockClient {
                client: Client::new(sdk_config),
            }),
            model,
        )
    }

    /// Create a provider for any Bedrock model ID (or inference profile ID).
    ///
    /// The model name is the ID itself and conservative token limits are
    /// assumed. No inference profile prefix is added.
    pub fn from_model_id(sdk_config: &SdkConfig, model_id: impl Into<String>) -> Self {
        Self::for_model_id(
            Arc::new(SdkBedrockClient {
                client: Client::new(sdk_config),
            }),
            model_id.into(),
        )
    }

    fn with_bedrock_client(client: Arc<dyn BedrockClient>, model: impl BedrockModel) -> Self {
        Self {
            client,
            base_model_id: model.bedrock_id().to_string(),
            inference_profile: model.default_inference_profile(),
            model_name: model.name().to_string(),
            max_context_tokens: model.max_context_tokens(),
            max_output_tokens: model.max_output_tokens(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            top_p: None,
        }
    }

    fn for_model_id(client: Arc<dyn BedrockClient>, model_id: String) -> Self {
        Self {
            client,
            model_name: model_id.clone(),
            base_model_id: model_id,
            inference_profile: InferenceProfile::None,
            max_context_tokens: CUSTOM_MODEL_CONTEXT_TOKENS,
            max_output_tokens: CUSTOM_MODEL_OUTPUT_TOKENS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
            top_p: None,
        }
    }

    pub fn with_inference_profile(mut self, profile: InferenceProfile) -> Self {
        self.inference_profile = profile;
        self
    }

    /// Max output tokens per call, capped at the model's limit
    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        let cap = i32::try_from(self.max_output_tokens).unwrap_or(i32::MAX);
        self.max_tokens = max_tokens.clamp(1, cap);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Model ID sent to Bedrock, including any inference profile prefix
    pub fn effective_model_id(&self) -> String {
        self.inference_profile.apply_to(&self.base_model_id)
    }

    fn build_request(
        &self,
        messages: Vec<BedrockMessage>,
        tools: Vec<BedrockTool>,
        system_prompt: Option<String>,
    ) -> ConverseRequest {
        ConverseRequest {
            model_id: self.effective_model_id(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            system_prompt,
            tools,
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for BedrockProvider {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn max_context_tokens(&self) -> usize {
        self.max_context_tokens
    }

    fn max_output_tokens(&self) -> usize {
        self.max_output_tokens
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
        system_prompt: Option<String>,
    ) -> Result<ModelResponse, ProviderError> {
        let bedrock_messages: Vec<BedrockMessage> = messages
            .iter()
            .map(to_bedrock_message)
            .collect::<Result<Vec<_>, _>>()?;

        let bedrock_tools: Vec<BedrockTool> = tools
            .iter()
            .map(to_bedrock_tool)
            .collect::<Result<Vec<_>, _>>()?;

        let response = self
            .client
            .converse(self.build_request(bedrock_messages, bedrock_tools, system_prompt))
            .await?;

        let output = response
            .output
            .ok_or_else(|| ProviderError::Model("No output from model".to_string()))?;

        let bedrock_message = match output {
            aws_sdk_bedrockruntime::types::ConverseOutput::Message(msg) => msg,
            _ => {
                return Err(ProviderError::Model(
                    "Unexpected output type from model".to_string(),
                ))
            }
        };

        let usage = response.usage.as_ref().map(|u| TokenUsage {
            input_tokens: usize::try_from(u.input_tokens).unwrap_or_default(),
            output_tokens: usize::try_from(u.output_tokens).unwrap_or_default(),
        });

        Ok(ModelResponse {
            message: from_bedrock_message(&bedrock_message),
            stop_reason: from_bedrock_stop_reason(&response.stop_reason),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaudeHaiku4_5, NovaMicro};
    use crate::types::{StopReason, ToolUseBlock};
    use aws_sdk_bedrockruntime::types::{
        ContentBlock as BedrockContentBlock, ConversationRole, ConverseMetrics,
        ConverseOutput as OutputBlock, StopReason as BedrockStopReason,
        TokenUsage as BedrockTokenUsage,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct TestBedrockClient {
        responses: Mutex<Vec<Result<ConverseOutput, ProviderError>>>,
        requests: Mutex<Vec<(String, usize, usize, Option<String>)>>,
    }

    impl TestBedrockClient {
        fn with_response(self, response: Result<ConverseOutput, ProviderError>) -> Self {
            self.responses.lock().unwrap().push(response);
            self
        }
    }

    #[async_trait::async_trait]
    impl BedrockClient for TestBedrockClient {
        async fn converse(&self, req: ConverseRequest) -> Result<ConverseOutput, ProviderError> {
            self.requests.lock().unwrap().push((
                req.model_id,
                req.messages.len(),
                req.tools.len(),
                req.system_prompt,
            ));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ProviderError::Other("no response queued".to_string())))
        }
    }

    fn converse_output(message: BedrockMessage, stop: BedrockStopReason) -> ConverseOutput {
        ConverseOutput::builder()
            .output(OutputBlock::Message(message))
            .stop_reason(stop)
            .usage(
                BedrockTokenUsage::builder()
                    .input_tokens(12)
                    .output_tokens(3)
                    .total_tokens(15)
                    .build()
                    .unwrap(),
            )
            .metrics(ConverseMetrics::builder().latency_ms(20).build().unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_provider_uses_model_defaults() {
        let provider =
            BedrockProvider::with_bedrock_client(Arc::new(TestBedrockClient::default()), NovaMicro);

        assert_eq!(provider.name(), "Nova Micro");
        assert_eq!(provider.max_context_tokens(), 128_000);
        assert_eq!(provider.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(provider.temperature, None);
        assert_eq!(provider.effective_model_id(), "amazon.nova-micro-v1:0");
    }

    #[test]
    fn test_global_profile_prefixes_model_id() {
        let provider = BedrockProvider::with_bedrock_client(
            Arc::new(TestBedrockClient::default()),
            ClaudeHaiku4_5,
        );
        assert_eq!(
            provider.effective_model_id(),
            "global.anthropic.claude-haiku-4-5-20251001-v1:0"
        );

        let provider = provider.with_inference_profile(InferenceProfile::EU);
        assert_eq!(
            provider.effective_model_id(),
            "eu.anthropic.claude-haiku-4-5-20251001-v1:0"
        );
    }

    #[test]
    fn test_custom_model_id() {
        let provider = BedrockProvider::for_model_id(
            Arc::new(TestBedrockClient::default()),
            "us.amazon.nova-pro-v1:0".to_string(),
        );
        assert_eq!(provider.name(), "us.amazon.nova-pro-v1:0");
        assert_eq!(provider.effective_model_id(), "us.amazon.nova-pro-v1:0");
        assert_eq!(provider.max_output_tokens(), CUSTOM_MODEL_OUTPUT_TOKENS);
    }

    #[test]
    fn test_builder_chaining() {
        let provider =
            BedrockProvider::with_bedrock_client(Arc::new(TestBedrockClient::default()), NovaMicro)
                .with_max_tokens(1000)
                .with_temperature(0.0)
                .with_top_p(0.8);

        assert_eq!(provider.max_tokens, 1000);
        assert_eq!(provider.temperature, Some(0.0));
        assert_eq!(provider.top_p, Some(0.8));
    }

    #[test]
    fn test_max_tokens_capped_at_model_limit() {
        let provider =
            BedrockProvider::with_bedrock_client(Arc::new(TestBedrockClient::default()), NovaMicro)
                .with_max_tokens(1_000_000);
        assert_eq!(provider.max_tokens, 5_000);
    }

    #[tokio::test]
    async fn test_generate_converts_tool_use_response() {
        let tool_use = aws_sdk_bedrockruntime::types::ToolUseBlock::builder()
            .tool_use_id("tu_1")
            .name("count_public_s3_buckets")
            .input(aws_smithy_types::Document::Object(Default::default()))
            .build()
            .unwrap();
        let message = BedrockMessage::builder()
            .role(ConversationRole::Assistant)
            .content(BedrockContentBlock::ToolUse(tool_use))
            .build()
            .unwrap();

        let client = Arc::new(TestBedrockClient::default().with_response(Ok(converse_output(
            message,
            BedrockStopReason::ToolUse,
        ))));
        let provider = BedrockProvider::with_bedrock_client(client.clone(), NovaMicro);

        let tools = vec![ToolDefinition {
            name: "count_public_s3_buckets".to_string(),
            description: "Return the number of S3 buckets that are publicly accessible."
                .to_string(),
            input_schema: serde_json::json!({"type": "object"}),
        }];
        let response = provider
            .generate(
                vec![Message::user("How many public buckets?")],
                tools,
                Some("system".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(
            response.message.tool_uses(),
            vec![&ToolUseBlock {
                id: "tu_1".to_string(),
                name: "count_public_s3_buckets".to_string(),
                input: serde_json::json!({}),
            }]
        );
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                input_tokens: 12,
                output_tokens: 3
            })
        );

        let requests = client.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            (
                "amazon.nova-micro-v1:0".to_string(),
                1,
                1,
                Some("system".to_string())
            )
        );
    }

    #[tokio::test]
    async fn test_generate_provider_error() {
        let client = TestBedrockClient::default()
            .with_response(Err(ProviderError::RateLimited("slow down".to_string())));
        let provider = BedrockProvider::with_bedrock_client(Arc::new(client), NovaMicro);

        let result = provider.generate(vec![Message::user("Hi")], vec![], None).await;
        assert!(matches!(result, Err(ProviderError::RateLimited(msg)) if msg == "slow down"));
    }

    #[test]
    fn test_classify_throttling_exception() {
        let err = classify_error_message(
            "ThrottlingException: Your request was denied due to exceeding the account quotas for Amazon Bedrock",
            "Your request was denied".into(),
        );
        assert!(matches!(err, ProviderError::RateLimited(_)), "got {:?}", err);
    }

    #[test]
    fn test_classify_access_denied_exception() {
        let err = classify_error_message(
            "AccessDeniedException: You don't have access to the model with the specified model ID.",
            "You don't have access".into(),
        );
        assert!(matches!(err, ProviderError::Authentication(_)), "got {:?}", err);
    }

    #[test]
    fn test_classify_expired_token() {
        let err = classify_error_message(
            "ExpiredTokenException: The security token included in the request is expired",
            "expired".into(),
        );
        assert!(matches!(err, ProviderError::Authentication(_)));
    }

    #[test]
    fn test_classify_service_unavailable() {
        let cases = [
            "ServiceUnavailableException: The service isn't currently available",
            "InternalServerException: An internal server error occurred",
        ];
        for msg in cases {
            let err = classify_error_message(msg, msg.into());
            assert!(matches!(err, ProviderError::ServiceUnavailable(_)), "{}", msg);
        }
    }

    #[test]
    fn test_classify_validation_exception() {
        let err = classify_error_message(
            "ValidationException: The provided model identifier is invalid.",
            "The provided model identifier is invalid.".into(),
        );
        assert!(matches!(err, ProviderError::Configuration(_)), "got {:?}", err);
    }

    #[test]
    fn test_classify_model_timeout_and_network() {
        let err = classify_error_message(
            "ModelTimeoutException: The request took too long to process",
            "took too long".into(),
        );
        assert!(matches!(err, ProviderError::Network(_)), "got {:?}", err);

        let err = classify_error_message(
            "io error: connection refused",
            "connection refused".into(),
        );
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[test]
    fn test_classify_unknown_keeps_root_message() {
        let err = classify_error_message("something odd happened", "something odd".into());
        match err {
            ProviderError::Other(msg) => assert_eq!(msg, "something odd"),
            other => panic!("expected Other, got {:?}", other),
        }
    }
}
