//! AgentBuilder for fluent agent construction
//!
//! Provider creation can be async (Bedrock loads AWS config), so it is
//! deferred to `.build().await`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::conversation::{
    BoxedConversationManager, ConversationManager, SlidingWindowConversationManager,
};
use crate::events::AgentHook;
use crate::provider::ModelProvider;
use crate::tool::{box_tool, DynTool, Tool};

use super::types::DEFAULT_MAX_ITERATIONS;
use super::Agent;

#[cfg(feature = "bedrock")]
use crate::model::BedrockModel;
#[cfg(feature = "bedrock")]
use crate::provider::BedrockProvider;

type ProviderFactory = Box<
    dyn FnOnce()
            -> Pin<Box<dyn Future<Output = crate::error::Result<Arc<dyn ModelProvider>>> + Send>>
        + Send,
>;

/// Builder for [`Agent`]
///
/// ```ignore
/// let agent = Agent::builder()
///     .bedrock(ClaudeHaiku4_5)
///     .with_system_prompt("You answer questions about an AWS account.")
///     .add_tools(awschat_tools::aws::all_tools(&sdk_config))
///     .build()
///     .await?;
/// ```
pub struct AgentBuilder {
    provider_factory: Option<ProviderFactory>,
    tools: Vec<Box<dyn DynTool>>,
    system_prompt: Option<String>,
    max_iterations: usize,
    conversation_manager: Option<BoxedConversationManager>,
    hooks: Vec<Arc<dyn AgentHook>>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider_factory: None,
            tools: Vec::new(),
            system_prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            conversation_manager: None,
            hooks: Vec::new(),
        }
    }

    /// Use AWS Bedrock with one of the predefined models and default AWS config.
    #[cfg(feature = "bedrock")]
    pub fn bedrock(mut self, model: impl BedrockModel + 'static) -> Self {
        self.provider_factory = Some(Box::new(move || {
            Box::pin(async move {
                let provider = BedrockProvider::new(model).await?;
                Ok(Arc::new(provider) as Arc<dyn ModelProvider>)
            })
        }));
        self
    }

    /// Use an already constructed provider.
    pub fn provider(mut self, provider: impl ModelProvider + 'static) -> Self {
        let provider = Arc::new(provider) as Arc<dyn ModelProvider>;
        self.provider_factory = Some(Box::new(move || Box::pin(async move { Ok(provider) })));
        self
    }

    pub fn add_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(box_tool(tool));
        self
    }

    /// Add several boxed tools, e.g. from [`crate::box_tools!`].
    pub fn add_tools(mut self, tools: impl IntoIterator<Item = Box<dyn DynTool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Cap on model calls per run. Values below 1 are raised to 1.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn with_conversation_manager(mut self, manager: impl ConversationManager + 'static) -> Self {
        self.conversation_manager = Some(Box::new(manager));
        self
    }

    pub fn with_hook(mut self, hook: impl AgentHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Build the agent.
    ///
    /// Fails with a configuration error if no provider was set or if two
    /// tools share a name.
    pub async fn build(self) -> crate::error::Result<Agent> {
        let provider_factory = self.provider_factory.ok_or_else(|| {
            crate::error::Error::Config(
                "No provider configured. Call .bedrock() or .provider() before .build()"
                    .to_string(),
            )
        })?;

        for (idx, tool) in self.tools.iter().enumerate() {
            if self.tools[..idx].iter().any(|t| t.name() == tool.name()) {
                return Err(crate::error::Error::Config(format!(
                    "Tool '{}' is registered more than once",
                    tool.name()
                )));
            }
        }

        let provider = provider_factory().await?;

        let conversation_manager = self
            .conversation_manager
            .unwrap_or_else(|| Box::new(SlidingWindowConversationManager::new()));

        Ok(Agent {
            provider,
            system_prompt: self.system_prompt,
            tools: self.tools,
            max_iterations: self.max_iterations,
            hooks: parking_lot::RwLock::new(self.hooks),
            conversation_manager: parking_lot::RwLock::new(conversation_manager),
        })
    }
}

impl Agent {
    /// Create a new AgentBuilder for fluent configuration
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }
}
