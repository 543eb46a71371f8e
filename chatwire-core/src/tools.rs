//! Tool descriptors offered to the model

use schemars::JsonSchema;
use serde_json::Value;
use thiserror::Error;

/// Why a tool's input schema could not be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolSchemaError {
    #[error("schema for tool '{tool}' is not a JSON object")]
    NotAnObject { tool: String },

    #[error("failed to build schema for tool '{tool}': {message}")]
    Generation { tool: String, message: String },
}

/// Anything that can be advertised to the model as a callable function
pub trait BaseTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the tool's input object
    fn json_schema(&self) -> Result<Value, ToolSchemaError>;
}

/// A tool described by static data
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Derive the input schema from a Rust type
    pub fn from_type<T: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ToolSchemaError> {
        let name = name.into();
        let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| {
            ToolSchemaError::Generation {
                tool: name.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::new(name, description, schema))
    }
}

impl BaseTool for ToolSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn json_schema(&self) -> Result<Value, ToolSchemaError> {
        if !self.input_schema.is_object() {
            return Err(ToolSchemaError::NotAnObject {
                tool: self.name.clone(),
            });
        }
        Ok(self.input_schema.clone())
    }
}
