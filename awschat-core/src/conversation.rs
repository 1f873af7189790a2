//! Conversation history and context window selection
//!
//! A [`ConversationManager`] stores every message of the process lifetime and
//! decides which of them are sent on each model call.
//!
//! - [`SlidingWindowConversationManager`] is the default. It keeps the most
//!   recent messages that fit the model's context window.
//! - [`SimpleConversationManager`] keeps the last N messages.
//!
//! Both start the selected window at a plain user message, so a tool result
//! is never sent without the tool call it answers.

use crate::types::{Message, Role};

/// Context window size of the active model
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    pub max_context_tokens: usize,
}

impl ContextLimits {
    pub fn new(max_context_tokens: usize) -> Self {
        Self { max_context_tokens }
    }
}

/// Token estimator supplied by the agent (backed by the provider)
pub type TokenEstimator<'a> = &'a dyn Fn(&[Message]) -> usize;

pub trait ConversationManager: Send + Sync {
    fn add_message(&mut self, message: Message);

    /// Messages to send on the next model call, oldest first
    fn messages_for_context(
        &self,
        limits: ContextLimits,
        estimate_tokens: TokenEstimator<'_>,
    ) -> Vec<Message>;

    fn all_messages(&self) -> &[Message];

    /// Drop every message after the first `len`. Used to undo a failed run.
    fn truncate(&mut self, len: usize);
}

pub type BoxedConversationManager = Box<dyn ConversationManager>;

/// Index of the first message that can open a context window.
fn first_turn_start(messages: &[Message]) -> usize {
    messages
        .iter()
        .position(|m| m.role == Role::User && !m.has_tool_results())
        .unwrap_or(messages.len())
}

/// Token-aware window over the most recent messages.
///
/// A fraction of the context window is held back for the system prompt and
/// tool definitions, and another for the response.
#[derive(Debug, Clone)]
pub struct SlidingWindowConversationManager {
    messages: Vec<Message>,
    system_prompt_reserve: f32,
    response_reserve: f32,
}

impl Default for SlidingWindowConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingWindowConversationManager {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            system_prompt_reserve: 0.10,
            response_reserve: 0.20,
        }
    }

    /// Reserves are fractions of the context window, each clamped to 0.0..=0.5
    pub fn with_reserve(system_prompt_reserve: f32, response_reserve: f32) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt_reserve: system_prompt_reserve.clamp(0.0, 0.5),
            response_reserve: response_reserve.clamp(0.0, 0.5),
        }
    }

    fn available_tokens(&self, limits: ContextLimits) -> usize {
        let max = limits.max_context_tokens;
        let reserved = (max as f32 * (self.system_prompt_reserve + self.response_reserve)) as usize;
        max.saturating_sub(reserved)
    }
}

impl ConversationManager for SlidingWindowConversationManager {
    fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn messages_for_context(
        &self,
        limits: ContextLimits,
        estimate_tokens: TokenEstimator<'_>,
    ) -> Vec<Message> {
        let available = self.available_tokens(limits);

        let mut start = self.messages.len();
        let mut total_tokens = 0;
        for (idx, message) in self.messages.iter().enumerate().rev() {
            let msg_tokens = estimate_tokens(std::slice::from_ref(message));
            if total_tokens + msg_tokens > available {
                break;
            }
            total_tokens += msg_tokens;
            start = idx;
        }

        let window = &self.messages[start..];
        window[first_turn_start(window)..].to_vec()
    }

    fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }
}

/// Keeps the last `max_messages` messages regardless of size.
#[derive(Debug, Clone)]
pub struct SimpleConversationManager {
    messages: Vec<Message>,
    max_messages: usize,
}

impl SimpleConversationManager {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }
}

impl ConversationManager for SimpleConversationManager {
    fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    fn messages_for_context(
        &self,
        _limits: ContextLimits,
        _estimate_tokens: TokenEstimator<'_>,
    ) -> Vec<Message> {
        let start = self.messages.len().saturating_sub(self.max_messages);
        let window = &self.messages[start..];
        window[first_turn_start(window)..].to_vec()
    }

    fn all_messages(&self) -> &[Message] {
        &self.messages
    }

    fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }
}
