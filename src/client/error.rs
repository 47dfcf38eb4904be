use async_openai::error::OpenAIError;
use thiserror::Error;

/// Why a model round-trip failed. Either one ends the turn.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Connection refused, timeout, or the body could not be read.
    #[error("could not reach the model server: {0}")]
    Transport(String),
    /// The server answered, but not with a usable chat completion.
    #[error("unexpected response from the model server: {0}")]
    Protocol(String),
}

impl From<OpenAIError> for ChatError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(err) => ChatError::Transport(err.to_string()),
            other => ChatError::Protocol(other.to_string()),
        }
    }
}

impl ChatError {
    /// The line shown to the user in place of an answer.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Transport(detail) => {
                format!("I couldn't reach the model server ({detail}). Is it running?")
            }
            ChatError::Protocol(detail) => {
                format!("The model server sent a response I couldn't understand ({detail}).")
            }
        }
    }
}
