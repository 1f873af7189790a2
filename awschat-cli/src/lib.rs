//! Interactive shell for awschat
//!
//! This crate provides:
//! - Environment-driven configuration for the Bedrock model
//! - Agent construction with the AWS inspection tools
//! - A line-oriented REPL with command history

pub mod config;
mod error;
pub mod repl;

pub use config::{build_agent, ChatConfig, ConfigError, SYSTEM_PROMPT};
pub use error::CliError;
pub use repl::{run_cli, run_loop, Input, LineSource, Responder, RustylineSource};
