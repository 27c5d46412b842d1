// ABOUTME: Generic OpenAI-compatible LLM provider for hosted and self-hosted endpoints
// ABOUTME: Supports OpenAI, DeepSeek, Zhipu GLM and any other chat/completions-compatible API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any endpoint speaking the `OpenAI` chat
//! completions API. The base URL comes from the model configuration, so the
//! same provider serves `OpenAI` itself and the many gateways that mimic it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use health_planner::llm::{
//!     ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
//! };
//! use health_planner::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = OpenAiCompatibleConfig::custom("https://open.bigmodel.cn/api/paas/v4/", "key", "glm-4-flash");
//!     let provider = OpenAiCompatibleProvider::new(config)?;
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::user("什么是有氧运动？"),
//!     ]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{
    build_http_client, error_for_status, ChatMessage, ChatRequest, ChatResponse, LlmProvider,
    TokenUsage,
};
use crate::constants::providers::{OPENAI_BASE_URL, OPENAI_DEFAULT_MODEL, OPENAI_MODELS};
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API, ending with `/` (e.g. <https://api.openai.com/v1/>)
    pub base_url: String,
    /// API key sent as a bearer token
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for display/logging
    pub provider_name: String,
}

impl OpenAiCompatibleConfig {
    /// Configuration for the public `OpenAI` API
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::custom(OPENAI_BASE_URL, api_key, OPENAI_DEFAULT_MODEL)
    }

    /// Configuration for an arbitrary compatible endpoint
    #[must_use]
    pub fn custom(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        Self {
            base_url: base_url.into(),
            api_key: Some(api_key).filter(|k| !k.is_empty()),
            default_model: model.into(),
            provider_name: "OpenAI".to_owned(),
        }
    }
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .finish()
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
///
/// Works with any endpoint that implements the `OpenAI` chat completions API.
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: build_http_client()?,
            config,
        })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    /// Convert internal messages to `OpenAI` format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages.iter().map(OpenAiMessage::from).collect()
    }

    /// Log message details for debugging LLM interactions
    fn log_messages_debug(messages: &[OpenAiMessage], provider_name: &str) {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message[{i}] role={}, content_len={}",
                msg.role,
                msg.content.len()
            );
        }
        debug!(
            "Sending chat completion request to {provider_name} with {} messages",
            messages.len()
        );
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let provider = &self.config.provider_name;
        match serde_json::from_str::<OpenAiErrorResponse>(body) {
            Ok(error_response) if status.as_u16() == 429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_rate_limit_message(&error_response.error.message),
            ),
            Ok(error_response) => {
                let error_type = error_response
                    .error
                    .error_type
                    .unwrap_or_else(|| "unknown".to_owned());
                error_for_status(
                    provider,
                    status,
                    &format!("{error_type}: {}", error_response.error.message),
                )
            }
            // Gateways often answer with HTML or plain text
            Err(_) => error_for_status(
                provider,
                status,
                &body.chars().take(200).collect::<String>(),
            ),
        }
    }

    /// Extract a user-friendly rate limit message from OpenAI-compatible error
    fn extract_rate_limit_message(message: &str) -> String {
        const RETRY_PREFIX: &str = "try again in ";
        let lowered = message.to_lowercase();
        if let Some(retry_pos) = lowered.find(RETRY_PREFIX) {
            let after_prefix = &lowered[retry_pos + RETRY_PREFIX.len()..];
            if let Some(end_pos) = after_prefix.find(|c: char| !c.is_ascii_digit() && c != '.') {
                if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                    let seconds_int = seconds.ceil() as u64;
                    return format!("模型接口请求过于频繁，请在 {seconds_int} 秒后重试。");
                }
            }
        }
        "模型接口请求过于频繁，请稍后重试。".to_owned()
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI Compatible"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        OPENAI_MODELS
    }

    #[instrument(skip(self, request), fields(model = ?request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let converted_messages = Self::convert_messages(&request.messages);
        Self::log_messages_debug(&converted_messages, &self.config.provider_name);

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: converted_messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self.add_auth_header(http_request).send().await.map_err(|e| {
            error!(
                "Failed to send request to {}: {}",
                self.config.provider_name, e
            );
            AppError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "{} API error", self.config.provider_name);
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::generation_failed(format!("无法解析模型响应: {e}")).with_source(e)
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::generation_failed("模型响应中没有 choices"))?;

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::generation_failed("模型响应中没有文本内容"))?;

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!(
            "Performing {} health check at {}",
            self.config.provider_name, self.config.base_url
        );

        // The models endpoint is the lightest authenticated call
        let http_request = self.client.get(self.api_url("models"));
        let response = self.add_auth_header(http_request).send().await?;

        let healthy = response.status().is_success();
        if healthy {
            debug!("{} health check passed", self.config.provider_name);
        } else {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}
