//! Agent lifecycle events and observer hooks
//!
//! Hooks are synchronous observers: they see every event in order and
//! cannot change the run. [`LoggingHook`] forwards events to the `log`
//! facade.

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::tool::{format_call_plain, ToolResult};
use crate::types::StopReason;

/// Events emitted during [`crate::Agent::run`]
#[derive(Debug, Clone)]
pub enum AgentEvent {
    RunStarted {
        input: String,
        timestamp: Instant,
    },

    RunCompleted {
        output: String,
        duration: Duration,
    },

    RunFailed {
        error: String,
        duration: Duration,
    },

    /// About to call the model
    ModelCallStarted {
        message_count: usize,
        tool_count: usize,
        timestamp: Instant,
    },

    ModelCallCompleted {
        response_content: String,
        tokens: Option<TokenUsage>,
        duration: Duration,
        stop_reason: Option<StopReason>,
    },

    /// The model asked for a tool
    ToolRequested {
        tool_use_id: String,
        name: String,
        input: Value,
    },

    ToolExecuting {
        tool_use_id: String,
        name: String,
    },

    ToolCompleted {
        tool_use_id: String,
        name: String,
        output: ToolResult,
        duration: Duration,
    },

    /// The tool was unknown, rejected its input, or returned `ToolError`
    ToolFailed {
        tool_use_id: String,
        name: String,
        error: String,
        duration: Duration,
    },
}

/// Token counts reported by the provider for one model call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// Observer for agent events.
///
/// Closures implement this automatically:
///
/// ```ignore
/// agent.add_hook(|event: &AgentEvent| println!("{:?}", event));
/// ```
pub trait AgentHook: Send + Sync {
    fn on_event(&self, event: &AgentEvent);
}

impl<F> AgentHook for F
where
    F: Fn(&AgentEvent) + Send + Sync,
{
    fn on_event(&self, event: &AgentEvent) {
        self(event)
    }
}

/// Logs the agent lifecycle through the `log` facade.
///
/// Run and tool events go to `info`, model calls to `debug`, failures to
/// `warn`. Use `RUST_LOG=awschat_core=info` to watch the tool chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHook;

impl AgentHook for LoggingHook {
    fn on_event(&self, event: &AgentEvent) {
        match event {
            AgentEvent::RunStarted { input, .. } => {
                log::info!("run started ({} chars of input)", input.chars().count());
            }
            AgentEvent::RunCompleted { output, duration } => {
                log::info!(
                    "run completed in {:?} ({} chars of output)",
                    duration,
                    output.chars().count()
                );
            }
            AgentEvent::RunFailed { error, duration } => {
                log::warn!("run failed after {:?}: {}", duration, error);
            }
            AgentEvent::ModelCallStarted {
                message_count,
                tool_count,
                ..
            } => {
                log::debug!(
                    "calling model with {} messages and {} tools",
                    message_count,
                    tool_count
                );
            }
            AgentEvent::ModelCallCompleted {
                tokens,
                duration,
                stop_reason,
                ..
            } => match tokens {
                Some(usage) => log::debug!(
                    "model responded in {:?}, stop={:?}, tokens in={} out={}",
                    duration,
                    stop_reason,
                    usage.input_tokens,
                    usage.output_tokens
                ),
                None => log::debug!("model responded in {:?}, stop={:?}", duration, stop_reason),
            },
            AgentEvent::ToolRequested { name, input, .. } => {
                log::info!("invoking {}", format_call_plain(name, input));
            }
            AgentEvent::ToolExecuting { .. } => {}
            AgentEvent::ToolCompleted {
                name,
                output,
                duration,
                ..
            } => {
                log::info!("{} returned in {:?}: {}", name, duration, output.as_text());
            }
            AgentEvent::ToolFailed {
                name,
                error,
                duration,
                ..
            } => {
                log::warn!("{} failed after {:?}: {}", name, duration, error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_token_usage_total() {
        let cases = [(100, 50, 150), (0, 0, 0), (1, 0, 1), (0, 1, 1)];

        for (input, output, expected) in cases {
            let usage = TokenUsage {
                input_tokens: input,
                output_tokens: output,
            };
            assert_eq!(usage.total(), expected, "input={}, output={}", input, output);
        }
    }

    #[test]
    fn test_closure_is_hook() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let hook = move |_: &AgentEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        };

        hook.on_event(&AgentEvent::ToolExecuting {
            tool_use_id: "t1".to_string(),
            name: "count_public_s3_buckets".to_string(),
        });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logging_hook_handles_every_event() {
        let events = vec![
            AgentEvent::RunStarted {
                input: "hi".to_string(),
                timestamp: Instant::now(),
            },
            AgentEvent::ModelCallCompleted {
                response_content: String::new(),
                tokens: None,
                duration: Duration::from_millis(5),
                stop_reason: Some(StopReason::ToolUse),
            },
            AgentEvent::ToolRequested {
                tool_use_id: "t1".to_string(),
                name: "describe_bucket_contents".to_string(),
                input: serde_json::json!({"bucket": "logs"}),
            },
            AgentEvent::ToolFailed {
                tool_use_id: "t1".to_string(),
                name: "describe_bucket_contents".to_string(),
                error: "boom".to_string(),
                duration: Duration::ZERO,
            },
            AgentEvent::RunFailed {
                error: "boom".to_string(),
                duration: Duration::ZERO,
            },
        ];

        for event in &events {
            LoggingHook.on_event(event);
        }
    }
}
