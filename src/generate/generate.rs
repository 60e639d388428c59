//! LLM API integration for OpenAI-compatible chat completion endpoints.
//!
//! Agents never talk HTTP directly: they receive an `Arc<dyn LanguageModel>`
//! so the endpoint can be swapped for a scripted fake in tests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header::{HeaderMap, HeaderValue}, Client};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::errors::{ApiError, ConfigError, LLMGraphResult};
use crate::models::tools::*;

/// The capability every workflow node depends on: turn role-tagged messages
/// into a completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier used in logs (usually the model name).
    fn name(&self) -> &str;

    /// Generate a text response without tool support.
    async fn generate(&self, messages: Vec<Message>) -> LLMGraphResult<String>;

    /// Generate a full assistant message, which may carry tool calls.
    ///
    /// Models without function calling keep the default, which fails with
    /// [`ApiError::ToolsUnsupported`].
    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<Tool>,
    ) -> LLMGraphResult<Message> {
        let _ = (messages, tools);
        Err(ApiError::ToolsUnsupported(self.name().to_string()).into())
    }
}

#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, messages: Vec<Message>) -> LLMGraphResult<String> {
        (**self).generate(messages).await
    }

    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<Tool>,
    ) -> LLMGraphResult<Message> {
        (**self).generate_with_tools(messages, tools).await
    }
}

#[derive(Serialize)]
struct ChatCompletion<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [Tool]>,
}

/// HTTP client for a chat completions endpoint, built once from a [`ModelConfig`].
///
/// # Example
/// ```rust,no_run
/// use squirrelgraph::config::ModelConfig;
/// use squirrelgraph::generate::{ChatClient, LanguageModel};
/// use squirrelgraph::Message;
///
/// # async fn demo() -> squirrelgraph::LLMGraphResult<()> {
/// let client = ChatClient::new(ModelConfig::from_env()?)?;
/// let reply = client.generate(vec![Message::user("Say hello")]).await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    config: ModelConfig,
    url: String,
}

impl ChatClient {
    pub fn new(config: ModelConfig) -> LLMGraphResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
            ConfigError::InvalidValue {
                name: crate::config::API_KEY_ENV,
                reason: e.to_string(),
            }
        })?;
        bearer.set_sensitive(true);
        headers.insert("authorization", bearer);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::RequestFailed(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: config.completions_url(),
            config,
        })
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[Tool]>,
    ) -> LLMGraphResult<Message> {
        let chat_completion = ChatCompletion {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: tools.filter(|t| !t.is_empty()),
        };

        info!(
            model = self.config.model.as_str(),
            messages = messages.len(),
            tools = tools.map_or(0, |t| t.len()),
            "Sending chat completion request"
        );

        let response: LLMResponse = self
            .http
            .post(&self.url)
            .json(&chat_completion)
            .send()
            .await
            .map_err(ApiError::from)?
            .error_for_status()
            .map_err(ApiError::from)?
            .json()
            .await
            .map_err(ApiError::from)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse("response has no choices".to_string()))?;
        debug!(finish_reason = ?choice.finish_reason, "Received chat completion");
        Ok(choice.message)
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, messages: Vec<Message>) -> LLMGraphResult<String> {
        let message = self.complete(&messages, None).await?;
        Ok(message.content.unwrap_or_default())
    }

    async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<Tool>,
    ) -> LLMGraphResult<Message> {
        self.complete(&messages, Some(&tools)).await
    }
}
