//! Tools for the AWS chatbot agent
//!
//! See [`aws`] for the inspection tools and the client traits they run on.

pub mod aws;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use awschat_core::{Tool, ToolError, ToolResult};
    pub use schemars::JsonSchema;
    pub use serde::Deserialize;
}
