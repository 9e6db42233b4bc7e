//! Agent tools and the registry the agent invokes them through.
//!
//! A [`Tool`] declares a typed input (whose JSON Schema is derived with
//! `schemars`) and a serializable output. The registry erases those types so
//! the agent loop can dispatch by name with raw JSON arguments.

pub mod company_info_search;
pub mod web_search;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::domain::chat::ToolDefinition;

pub use company_info_search::CompanyInfoSearchTool;
pub use web_search::WebSearchTool;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize output of {tool}: {source}")]
    Output {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Input: DeserializeOwned + JsonSchema + Send + 'static;
    type Output: Serialize + Send;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Handles one invocation. Failures are expected to be folded into the
    /// output so the conversation can continue.
    async fn call(&self, input: Self::Input) -> Self::Output;
}

#[async_trait]
trait ErasedTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn invoke(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError>;
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: input_schema::<T::Input>(),
        }
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let input: T::Input =
            serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
                tool: self.name().to_string(),
                source,
            })?;
        let output = self.call(input).await;
        serde_json::to_value(output).map_err(|source| ToolError::Output {
            tool: self.name().to_string(),
            source,
        })
    }
}

/// JSON Schema for a tool input, without the `$schema`/`title` envelope.
pub fn input_schema<I: JsonSchema>() -> serde_json::Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(I))
        .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    schema
}

/// Name → tool map. Names are unique; registering twice replaces the tool.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ErasedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool>(&mut self, tool: T) -> &mut Self {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Arc::new(tool)).is_some() {
            log::warn!("Tool '{}' registered twice; keeping the latest", name);
        }
        self
    }

    pub fn with<T: Tool>(mut self, tool: T) -> Self {
        self.register(tool);
        self
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub async fn invoke(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        log::debug!("Invoking tool '{}' with {}", name, arguments);
        tool.invoke(arguments).await
    }
}
