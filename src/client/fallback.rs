use super::ToolCall;
use crate::types::ToolSet;

use serde_json::{Map, Value};

pub const FALLBACK_CALL_ID: &str = "fallback_call_0";

/// Small models sometimes print a tool call into `content` instead of using
/// `tool_calls`, e.g. `{"name": "web_search", "parameters": {"query": "..."}}`.
/// Recovers that as a single call when it names a tool in `toolset`.
pub fn parse_inline_tool_call<C: Send + Sync + 'static>(
    content: &str,
    toolset: &ToolSet<C>,
) -> Option<ToolCall> {
    let trimmed = content.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    let object: Map<String, Value> = serde_json::from_str(trimmed).ok()?;

    let name = match object.get("name")?.as_str()? {
        "date" => "get_current_date",
        other => other,
    };
    if !toolset.contains(name) {
        return None;
    }
    let arguments = object
        .get("parameters")
        .filter(|value| value.is_object())
        .or_else(|| object.get("arguments").filter(|value| value.is_object()))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    Some(ToolCall {
        id: FALLBACK_CALL_ID.to_string(),
        name: name.to_string(),
        json: arguments.to_string(),
    })
}
