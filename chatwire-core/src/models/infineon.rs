use super::{Model, ModelId, ModelProvider};

pub const INFINEON_GPT4O: &str = "infineon-gpt4o";

pub(super) fn models() -> Vec<Model> {
    vec![Model {
        id: ModelId::new(INFINEON_GPT4O),
        name: "Infineon GPT-4o".to_string(),
        provider: ModelProvider::Infineon,
        api_model: "gpt-4o".to_string(),
        cost_per_1m_in: 2.50,
        cost_per_1m_out: 10.00,
        cost_per_1m_in_cached: 1.25,
        cost_per_1m_out_cached: 0.0,
        context_window: 128_000,
        default_max_tokens: 4096,
        can_reason: false,
        supports_attachments: true,
    }]
}
