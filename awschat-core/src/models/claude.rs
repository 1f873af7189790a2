use super::define_model;
use crate::model::InferenceProfile;

define_model!(
    /// Claude Haiku 4.5, the default model for the chatbot
    ClaudeHaiku4_5 {
        display_name: "Claude Haiku 4.5",
        bedrock_id: "anthropic.claude-haiku-4-5-20251001-v1:0",
        context_tokens: 200_000,
        output_tokens: 8_192,
        default_inference_profile: InferenceProfile::Global
    }
);

define_model!(
    ClaudeSonnet4_5 {
        display_name: "Claude Sonnet 4.5",
        bedrock_id: "anthropic.claude-sonnet-4-5-20250929-v1:0",
        context_tokens: 200_000,
        output_tokens: 64_000,
        default_inference_profile: InferenceProfile::Global
    }
);
