mod tool_object;

pub use tool_object::{ToolObject, ValidationError};

use super::Tool;
use crate::search::SearchError;
use async_openai::types::ChatCompletionTool;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::collections::hash_map::HashMap;
use thiserror::Error;

/// The tools offered to the model, in registration order.
pub struct ToolSet<C: Send + Sync + 'static> {
    order: Vec<String>,
    tools: HashMap<String, ToolObject<C>>,
}

#[derive(Debug, Error)]
pub enum ToolSetCreationError {
    #[error("error validating schema")]
    Validation(ValidationError),
    #[error("two or more tools have the same name: {0}")]
    NameConflict(String),
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("unknown tool `{0}`")]
    NotFound(String),
    #[error("invalid arguments for `{name}` (possible hallucination): {source}")]
    Deserialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("web search is unavailable: {0}")]
    Search(#[from] SearchError),
}

impl<C: Send + Sync + 'static> Default for ToolSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send + Sync + 'static> ToolSet<C> {
    pub fn new() -> Self {
        Self {
            order: vec![],
            tools: HashMap::new(),
        }
    }

    pub fn add_tool<T>(mut self) -> Result<Self, ToolSetCreationError>
    where
        T: JsonSchema + Tool<Context = C> + DeserializeOwned + 'static,
    {
        let tool_object =
            ToolObject::try_from_tool::<T>().map_err(ToolSetCreationError::Validation)?;
        if self.tools.contains_key(&tool_object.name) {
            Err(ToolSetCreationError::NameConflict(tool_object.name.clone()))
        } else {
            self.order.push(tool_object.name.clone());
            self.tools.insert(tool_object.name.clone(), tool_object);
            Ok(self)
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, tool_name: &str) -> bool {
        self.tools.contains_key(tool_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Decodes `json` against the named tool's schema and runs it. Models
    /// often send an empty string for tools without parameters; that decodes
    /// as `{}`.
    pub async fn try_tool_call(
        &self,
        context: &C,
        tool_name: &str,
        json: &str,
    ) -> Result<String, ToolCallError> {
        let json = if json.trim().is_empty() { "{}" } else { json };
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolCallError::NotFound(tool_name.to_owned()))
            .and_then(|tool| {
                tool.try_deserialize(json)
                    .map_err(|source| ToolCallError::Deserialization {
                        name: tool_name.to_owned(),
                        source,
                    })
            })?;
        tool.apply(context).await
    }

    pub fn openai_chatcompletion_toolset(&self) -> Vec<ChatCompletionTool> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(ChatCompletionTool::from)
            .collect()
    }
}
