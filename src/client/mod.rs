mod agent;
mod cli;
mod error;
mod fallback;
mod transport;

pub use agent::{Agent, SYSTEM_PROMPT};
pub use cli::{CliClient, Console, Palette, is_exit_command};
pub use error::ChatError;
pub use transport::{ChatTransport, ModelResponse, OllamaTransport, ToolCall};
