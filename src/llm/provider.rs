// ABOUTME: Unified LLM provider selector built from a session's model configuration
// ABOUTME: Abstracts over Gemini and OpenAI-compatible providers and runs the connection test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # LLM Provider Selector
//!
//! A [`ChatProvider`] is created per action from the caller's [`ModelConfig`],
//! so switching provider in the configuration form only changes which variant
//! handles the next request.
//!
//! ## Example
//!
//! ```rust,no_run
//! use health_planner::config::{LlmProviderType, ModelConfig};
//! use health_planner::llm::{ChatMessage, ChatRequest, ChatProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), health_planner::errors::AppError> {
//!     let config = ModelConfig::for_provider(LlmProviderType::Gemini, "my-key");
//!     let provider = ChatProvider::from_model_config(&config)?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("你好")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use tracing::{debug, info};

use super::prompts::CONNECTION_TESTER_PROMPT;
use super::{
    ChatRequest, ChatResponse, GeminiProvider, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider,
};
use crate::agent::Agent;
use crate::config::{LlmProviderType, ModelConfig};
use crate::errors::AppError;

/// Message sent by the connection test
pub const CONNECTION_TEST_INPUT: &str = "Hello, this is a test.";

/// Number of characters of the test reply shown to the user
const CONNECTION_TEST_PREVIEW_CHARS: usize = 100;

/// Unified chat provider that wraps Gemini or an `OpenAI`-compatible endpoint
pub enum ChatProvider {
    /// Google Gemini provider
    Gemini(GeminiProvider),
    /// Any `OpenAI`-compatible chat completions endpoint
    OpenAi(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create a provider from a model configuration
    ///
    /// The configuration is normalized first (base URL cleanup, model aliases,
    /// defaults).
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when no API key is set, `InvalidFormat`
    /// for an unusable base URL, or an internal error if the HTTP client
    /// cannot be built.
    pub fn from_model_config(config: &ModelConfig) -> Result<Self, AppError> {
        let config = config.normalized()?;

        info!(
            provider = %config.provider,
            model = %config.model,
            base_url = %config.base_url,
            api_key = %config.redacted_api_key(),
            "Initializing LLM provider"
        );

        let provider = match config.provider {
            LlmProviderType::Gemini => Self::Gemini(
                GeminiProvider::new(config.api_key)?
                    .with_base_url(config.base_url)
                    .with_default_model(config.model),
            ),
            LlmProviderType::OpenAi => Self::OpenAi(OpenAiCompatibleProvider::new(
                OpenAiCompatibleConfig::custom(config.base_url, config.api_key, config.model),
            )?),
        };

        debug!(
            "Provider {} initialized with model: {}",
            provider.display_name(),
            provider.default_model()
        );
        Ok(provider)
    }

    /// Send a short test message and return the beginning of the reply
    ///
    /// # Errors
    ///
    /// Returns the provider error, or `GenerationFailed` if the reply is empty.
    pub async fn test_connection(&self) -> Result<String, AppError> {
        let agent = Agent::new("测试助手", self).with_system_prompt(CONNECTION_TESTER_PROMPT);
        let response = agent.run(CONNECTION_TEST_INPUT).await?;
        Ok(response
            .content
            .chars()
            .take(CONNECTION_TEST_PREVIEW_CHARS)
            .collect())
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::OpenAi(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini(p) => p.display_name(),
            Self::OpenAi(p) => p.display_name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Gemini(p) => p.default_model(),
            Self::OpenAi(p) => p.default_model(),
        }
    }

    fn available_models(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini(p) => p.available_models(),
            Self::OpenAi(p) => p.available_models(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::Gemini(p) => p.complete(request).await,
            Self::OpenAi(p) => p.complete(request).await,
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::Gemini(p) => p.health_check().await,
            Self::OpenAi(p) => p.health_check().await,
        }
    }
}
