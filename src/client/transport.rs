use super::ChatError;
use crate::config::Config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage, ChatCompletionTool,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::debug;

// ollama ignores the key, but the client always sends one
const PLACEHOLDER_API_KEY: &str = "ollama";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub json: String,
}

impl From<ChatCompletionMessageToolCall> for ToolCall {
    fn from(call: ChatCompletionMessageToolCall) -> Self {
        Self {
            id: call.id,
            name: call.function.name,
            json: call.function.arguments,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// One non-streaming round-trip to the model.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tools: Option<&[ChatCompletionTool]>,
    ) -> Result<ModelResponse, ChatError>;
}

pub struct OllamaTransport {
    inner: Client<OpenAIConfig>,
    model: String,
    base_url: String,
}

impl OllamaTransport {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(PLACEHOLDER_API_KEY);
        Self {
            inner: Client::with_config(openai_config).with_http_client(http),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait]
impl ChatTransport for OllamaTransport {
    async fn chat(
        &self,
        messages: &[ChatCompletionRequestMessage],
        tools: Option<&[ChatCompletionTool]>,
    ) -> Result<ModelResponse, ChatError> {
        debug!(
            base_url = %self.base_url,
            model = %self.model,
            messages = messages.len(),
            tools = tools.map_or(0, <[_]>::len),
            "calling model"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages.to_vec())
            .stream(false)
            .n(1);
        if let Some(tools) = tools {
            args.tools(tools.to_vec());
        }
        let request = args.build()?;

        let response = self.inner.chat().create(request).await?;
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Protocol("response contained no choices".to_string()))?
            .message;

        Ok(ModelResponse {
            content: message.content.unwrap_or_default(),
            tool_calls: message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(ToolCall::from)
                .collect(),
        })
    }
}
