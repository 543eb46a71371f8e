use super::{Model, ModelId, ModelProvider};

pub const GPT_4O: &str = "gpt-4o";
pub const GPT_4O_MINI: &str = "gpt-4o-mini";

pub(super) fn models() -> Vec<Model> {
    vec![
        Model {
            id: ModelId::new(GPT_4O),
            name: "GPT-4o".to_string(),
            provider: ModelProvider::OpenAI,
            api_model: "gpt-4o".to_string(),
            cost_per_1m_in: 2.50,
            cost_per_1m_out: 10.00,
            cost_per_1m_in_cached: 1.25,
            cost_per_1m_out_cached: 0.0,
            context_window: 128_000,
            default_max_tokens: 4096,
            can_reason: false,
            supports_attachments: true,
        },
        Model {
            id: ModelId::new(GPT_4O_MINI),
            name: "GPT-4o mini".to_string(),
            provider: ModelProvider::OpenAI,
            api_model: "gpt-4o-mini".to_string(),
            cost_per_1m_in: 0.15,
            cost_per_1m_out: 0.60,
            cost_per_1m_in_cached: 0.075,
            cost_per_1m_out_cached: 0.0,
            context_window: 128_000,
            default_max_tokens: 4096,
            can_reason: false,
            supports_attachments: true,
        },
    ]
}
