// ABOUTME: Agent abstraction wrapping an LLM provider with a fixed system prompt
// ABOUTME: Exposes the single run(text) contract used for plans, answers and connection tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Agent
//!
//! An [`Agent`] is a named role (饮食专家, 健身专家, ...) bound to a provider.
//! Every model call in the planner goes through [`Agent::run`], which sends
//! `[system, user]` and guarantees a non-empty reply.

use tracing::{debug, instrument, warn};

use crate::config::ModelConfig;
use crate::constants::providers::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Sampling settings applied to every request an agent sends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token limit
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&ModelConfig> for GenerationSettings {
    fn from(config: &ModelConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Reply from [`Agent::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    /// Trimmed, non-empty reply text
    pub content: String,
    /// Model that produced the reply
    pub model: String,
}

/// A provider bound to a role and an optional system prompt
pub struct Agent<'a> {
    name: String,
    provider: &'a dyn LlmProvider,
    system_prompt: Option<String>,
    settings: GenerationSettings,
}

impl<'a> Agent<'a> {
    /// Create an agent with default generation settings and no system prompt
    #[must_use]
    pub fn new(name: impl Into<String>, provider: &'a dyn LlmProvider) -> Self {
        Self {
            name: name.into(),
            provider,
            system_prompt: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Set the system prompt sent before every input
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        let prompt = prompt.trim();
        self.system_prompt = (!prompt.is_empty()).then(|| prompt.to_owned());
        self
    }

    /// Override temperature and token limit
    #[must_use]
    pub const fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Role name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send `input` to the model and return its reply
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged, or `GenerationFailed` when the
    /// reply is empty after trimming.
    #[instrument(skip(self, input), fields(agent = %self.name, provider = self.provider.name()))]
    pub async fn run(&self, input: &str) -> Result<AgentResponse, AppError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = &self.system_prompt {
            messages.push(ChatMessage::system(prompt.as_str()));
        }
        messages.push(ChatMessage::user(input));

        let request = ChatRequest::new(messages)
            .with_model(self.provider.default_model())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        debug!(input_chars = input.chars().count(), "Running agent");
        let response = self.provider.complete(&request).await?;

        let content = response.content.trim();
        if content.is_empty() {
            warn!("Agent received an empty reply");
            return Err(AppError::generation_failed(format!(
                "{} 返回了空响应",
                self.name
            )));
        }

        Ok(AgentResponse {
            content: content.to_owned(),
            model: response.model,
        })
    }
}
