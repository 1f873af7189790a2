use super::define_model;

define_model!(
    /// Nova Micro, text only
    NovaMicro {
        display_name: "Nova Micro",
        bedrock_id: "amazon.nova-micro-v1:0",
        context_tokens: 128_000,
        output_tokens: 5_000
    }
);

define_model!(
    NovaLite {
        display_name: "Nova Lite",
        bedrock_id: "amazon.nova-lite-v1:0",
        context_tokens: 300_000,
        output_tokens: 5_000
    }
);

define_model!(
    NovaPro {
        display_name: "Nova Pro",
        bedrock_id: "amazon.nova-pro-v1:0",
        context_tokens: 300_000,
        output_tokens: 5_000
    }
);
