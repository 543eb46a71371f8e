//! Static model descriptors
//!
//! The registry is built once on first access and never mutated afterwards.

mod infineon;
mod openai;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::providers::error::ProviderError;

pub use infineon::INFINEON_GPT4O;
pub use openai::{GPT_4O, GPT_4O_MINI};

/// Identifier of a model in the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ModelId(pub String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend family a model is served by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    #[default]
    OpenAI,
    Infineon,
}

impl ModelProvider {
    /// Wire identifier used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::OpenAI => "openai",
            ModelProvider::Infineon => "infineon",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ModelProvider::OpenAI),
            "infineon" => Ok(ModelProvider::Infineon),
            other => Err(ProviderError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Immutable description of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
    pub provider: ModelProvider,
    /// Name sent to the backend in the `model` field
    pub api_model: String,
    pub cost_per_1m_in: f64,
    pub cost_per_1m_out: f64,
    pub cost_per_1m_in_cached: f64,
    pub cost_per_1m_out_cached: f64,
    pub context_window: u64,
    pub default_max_tokens: u64,
    pub can_reason: bool,
    pub supports_attachments: bool,
}

static SUPPORTED_MODELS: LazyLock<HashMap<ModelId, Model>> = LazyLock::new(|| {
    infineon::models()
        .into_iter()
        .chain(openai::models())
        .map(|model| (model.id.clone(), model))
        .collect()
});

/// All known models keyed by id
pub fn supported_models() -> &'static HashMap<ModelId, Model> {
    &SUPPORTED_MODELS
}

/// Look up a model by id
pub fn get_model(id: &str) -> Option<&'static Model> {
    SUPPORTED_MODELS.get(&ModelId::new(id))
}
