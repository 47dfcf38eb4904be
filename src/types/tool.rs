use super::ToolCallError;
use async_trait::async_trait;

/// A callable exposed to the model. Implementors are the tool's arguments:
/// each call deserializes a fresh value from the model's JSON and applies it.
#[async_trait]
pub trait Tool: Send + Sync {
    type Context: Send + Sync;

    async fn apply(&self, context: &Self::Context) -> Result<String, ToolCallError>;

    /// Builds the tool from arguments that were not a JSON object at all,
    /// e.g. a bare search string. Most tools have no such shorthand.
    fn from_bare_argument(_argument: &str) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
