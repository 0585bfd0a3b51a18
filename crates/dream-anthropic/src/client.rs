//! Messages API client

use async_trait::async_trait;
use dream_core::{GenerationConfig, GenerationError, GenerationRequest, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MESSAGES_PATH: &str = "/v1/messages";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Text generator backed by the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicGenerator {
    client: reqwest::Client,
    api_key: String,
    config: GenerationConfig,
}

impl AnthropicGenerator {
    /// Create generator with an explicit key
    ///
    /// # Errors
    /// Returns [`GenerationError::Config`] if the key is blank or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>, config: GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::Config(format!("{API_KEY_ENV} is empty")));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Create generator reading the key from `ANTHROPIC_API_KEY`
    pub fn from_env(config: GenerationConfig) -> Result<Self, GenerationError> {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Create generator reading the key through a lookup function
    pub fn from_lookup<F>(config: GenerationConfig, lookup: F) -> Result<Self, GenerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .ok_or_else(|| GenerationError::Config(format!("{API_KEY_ENV} is not set")))?;
        Self::new(api_key, config)
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), MESSAGES_PATH)
    }

    fn map_send_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                duration_secs: self.config.request_timeout_secs,
            }
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &request.system_prompt,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        tracing::debug!(model = %self.config.model, kind = ?request.kind, "calling messages API");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "messages API returned an error");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                GenerationError::Parse(format!("invalid messages response: {e}"))
            }
        })?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
