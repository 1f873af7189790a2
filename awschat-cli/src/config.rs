//! Startup configuration read from `AWSCHAT_*` environment variables
//!
//! Every variable is optional. AWS region and credentials are not handled
//! here; they come from the standard AWS chain.

use std::str::FromStr;

use aws_config::SdkConfig;
use awschat_core::{
    Agent, BedrockProvider, ClaudeHaiku4_5, InferenceProfile, LoggingHook, DEFAULT_MAX_ITERATIONS,
};
use thiserror::Error;

use crate::error::CliError;

pub const MODEL_ID_VAR: &str = "AWSCHAT_MODEL_ID";
pub const INFERENCE_PROFILE_VAR: &str = "AWSCHAT_INFERENCE_PROFILE";
pub const TEMPERATURE_VAR: &str = "AWSCHAT_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "AWSCHAT_MAX_TOKENS";
pub const MAX_ITERATIONS_VAR: &str = "AWSCHAT_MAX_ITERATIONS";

/// Instructions given to the model on every request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about the \
user's AWS account. Use the available tools to look up facts about S3 buckets, EC2 instances \
and IAM users instead of guessing. When a tool reports a failure, tell the user what failed.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Model settings for the chat agent
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Raw Bedrock model ID. `None` selects Claude Haiku 4.5.
    pub model_id: Option<String>,
    /// `None` keeps the model's default profile
    pub inference_profile: Option<InferenceProfile>,
    pub temperature: f32,
    pub max_tokens: i32,
    pub max_iterations: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model_id: None,
            inference_profile: None,
            temperature: 0.0,
            max_tokens: 4096,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let inference_profile = get(INFERENCE_PROFILE_VAR)
            .map(|v| {
                v.parse::<InferenceProfile>()
                    .map_err(|e| ConfigError::new(INFERENCE_PROFILE_VAR, &v, e))
            })
            .transpose()?;

        let temperature = match get(TEMPERATURE_VAR) {
            Some(v) => {
                let t: f32 = parse(TEMPERATURE_VAR, &v)?;
                if !t.is_finite() || t < 0.0 {
                    return Err(ConfigError::new(
                        TEMPERATURE_VAR,
                        &v,
                        "must be a non-negative number",
                    ));
                }
                t
            }
            None => defaults.temperature,
        };

        let max_tokens = match get(MAX_TOKENS_VAR) {
            Some(v) => positive(MAX_TOKENS_VAR, &v)?,
            None => defaults.max_tokens,
        };

        let max_iterations = match get(MAX_ITERATIONS_VAR) {
            Some(v) => positive(MAX_ITERATIONS_VAR, &v)?,
            None => defaults.max_iterations,
        };

        Ok(Self {
            model_id: get(MODEL_ID_VAR).map(|v| v.trim().to_string()),
            inference_profile,
            temperature,
            max_tokens,
            max_iterations,
        })
    }

    /// Bedrock provider for these settings
    pub fn provider(&self, sdk_config: &SdkConfig) -> BedrockProvider {
        let provider = match &self.model_id {
            Some(id) => BedrockProvider::from_model_id(sdk_config, id.as_str()),
            None => BedrockProvider::from_sdk_config(sdk_config, ClaudeHaiku4_5),
        };
        let provider = match self.inference_profile {
            Some(profile) => provider.with_inference_profile(profile),
            None => provider,
        };
        provider
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::new(var, value, e))
}

fn positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialOrd,
    T::Err: ToString,
{
    let n: T = parse(var, value)?;
    if n <= T::default() {
        return Err(ConfigError::new(var, value, "must be greater than zero"));
    }
    Ok(n)
}

/// Build the chat agent: Bedrock provider, system prompt and the AWS tools.
pub async fn build_agent(config: &ChatConfig, sdk_config: &SdkConfig) -> Result<Agent, CliError> {
    let provider = config.provider(sdk_config);
    log::debug!(
        "using model {} ({})",
        awschat_core::ModelProvider::name(&provider),
        provider.effective_model_id()
    );

    let agent = Agent::builder()
        .provider(provider)
        .with_system_prompt(SYSTEM_PROMPT)
        .add_tools(awschat_tools::aws::all_tools(sdk_config))
        .with_max_iterations(config.max_iterations)
        .with_hook(LoggingHook)
        .build()
        .await?;
    Ok(agent)
}
