//! Agent module for orchestrating model calls and tool use
//!
//! The Agent owns a provider, a fixed set of tools and the conversation
//! history. Each [`Agent::run`] drives the model until it produces a final
//! answer, executing requested tools in between.

mod builder;
mod helpers;
mod run;
mod tools;
mod types;

pub use builder::AgentBuilder;
pub use types::{
    AgentError, AgentResponse, TokenUsageStats, ToolCallInfo, ToolInfo, DEFAULT_MAX_ITERATIONS,
};

use std::sync::Arc;

use crate::conversation::{BoxedConversationManager, ContextLimits};
use crate::events::{AgentEvent, AgentHook};
use crate::provider::ModelProvider;
use crate::tool::DynTool;
use crate::types::Message;

/// Conversational agent over a [`ModelProvider`] and a set of tools.
///
/// Conversation history persists across calls to [`Agent::run`] for the
/// lifetime of the agent.
pub struct Agent {
    pub(super) provider: Arc<dyn ModelProvider>,
    pub(super) system_prompt: Option<String>,
    pub(super) tools: Vec<Box<dyn DynTool>>,
    pub(super) max_iterations: usize,
    pub(super) hooks: parking_lot::RwLock<Vec<Arc<dyn AgentHook>>>,
    pub(super) conversation_manager: parking_lot::RwLock<BoxedConversationManager>,
}

impl Agent {
    /// Register an observer for agent events.
    pub fn add_hook(&self, hook: impl AgentHook + 'static) {
        self.hooks.write().push(Arc::new(hook));
    }

    pub(crate) fn emit_event(&self, event: AgentEvent) {
        let hooks = self.hooks.read();
        for hook in hooks.iter() {
            hook.on_event(&event);
        }
    }

    pub fn model_name(&self) -> &str {
        self.provider.name()
    }

    /// Number of messages recorded so far, including tool traffic
    pub fn message_count(&self) -> usize {
        self.conversation_manager.read().all_messages().len()
    }

    pub(super) fn context_messages(&self) -> Vec<Message> {
        let limits = ContextLimits::new(self.provider.max_context_tokens());
        let provider = &self.provider;
        let estimate_tokens = |msgs: &[Message]| provider.estimate_message_tokens(msgs);
        self.conversation_manager
            .read()
            .messages_for_context(limits, &estimate_tokens)
    }
}
