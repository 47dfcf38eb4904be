mod tool;
mod toolset;

pub use tool::Tool;
pub use toolset::{ToolCallError, ToolObject, ToolSet, ToolSetCreationError, ValidationError};
