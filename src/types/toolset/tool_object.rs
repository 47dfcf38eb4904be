use crate::types::Tool;

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use schemars::JsonSchema;
use schemars::schema::{Schema, SchemaObject};
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use serde_json::Value;
use thiserror::Error;

type ToolTraitObject<C> = Box<dyn Tool<Context = C>>;
type Deserializer<C> = Box<dyn Fn(&str) -> Result<ToolTraitObject<C>, JsonError> + Send + Sync>;

// keys of the root schema that say nothing about the parameters themselves
const SCHEMA_ENVELOPE_KEYS: [&str; 3] = ["$schema", "title", "description"];

pub struct ToolObject<C: Send + Sync + 'static> {
    pub json_schema: Value,
    pub description: String,
    pub name: String,
    deserializer: Deserializer<C>,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tool schema is missing a title or description")]
    MissingMetadata,
    #[error("could not convert to json")]
    JsonSerialization(JsonError),
}

impl<C: Send + Sync + 'static> ToolObject<C> {
    pub fn try_deserialize(&self, data: &str) -> Result<ToolTraitObject<C>, JsonError> {
        let deserializer = &self.deserializer;
        deserializer(data)
    }
}

impl<C: Send + Sync + 'static> From<&ToolObject<C>> for ChatCompletionTool {
    fn from(value: &ToolObject<C>) -> Self {
        Self {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: value.name.clone(),
                description: Some(value.description.clone()),
                parameters: Some(value.json_schema.clone()),
                strict: None,
            },
        }
    }
}

impl<C: Send + Sync + 'static> ToolObject<C> {
    pub fn try_from_tool<T>() -> Result<Self, ValidationError>
    where
        T: JsonSchema + Tool<Context = C> + DeserializeOwned + 'static,
    {
        let schema = schema_for!(T);

        let (name, description) = validate_tool_schema(&schema.schema)?;

        let mut json_schema =
            serde_json::to_value(schema).map_err(ValidationError::JsonSerialization)?;
        if let Value::Object(root) = &mut json_schema {
            for key in SCHEMA_ENVELOPE_KEYS {
                root.remove(key);
            }
        }

        let deserializer = Box::new(|data: &str| match serde_json::from_str::<T>(data) {
            Ok(tool) => Ok(Box::new(tool) as ToolTraitObject<C>),
            Err(err) => bare_argument::<T>(data)
                .map(|tool| Box::new(tool) as ToolTraitObject<C>)
                .ok_or(err),
        });

        Ok(Self {
            name,
            json_schema,
            description,
            deserializer,
        })
    }
}

// only text that isn't a JSON value, or is a JSON string, counts as a bare argument
fn bare_argument<T: Tool>(data: &str) -> Option<T> {
    match serde_json::from_str::<Value>(data) {
        Ok(Value::String(text)) => T::from_bare_argument(&text),
        Ok(_) => None,
        Err(_) => T::from_bare_argument(data.trim()),
    }
}

fn validate_tool_schema(schema: &SchemaObject) -> Result<(String, String), ValidationError> {
    let name = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .title
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .to_string();

    let description = validate_tool_description(schema)?;
    Ok((name, description))
}

// this could probably be converted to a compile-time check with a macro
fn validate_tool_description(schema: &SchemaObject) -> Result<String, ValidationError> {
    // validate description on subschema
    let description = schema
        .metadata
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?
        .description
        .as_deref()
        .ok_or(ValidationError::MissingMetadata)?;

    if let Some(object) = schema.object.as_deref() {
        for sub_schema in object.properties.values() {
            if let Schema::Object(sub_schema_object) = sub_schema {
                validate_tool_description(sub_schema_object)?;
            }
        }
    }

    Ok(description.to_string())
}
