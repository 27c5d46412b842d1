// ABOUTME: Per-session model configuration (provider, model, API key, base URL)
// ABOUTME: Normalizes user-entered connection parameters before a provider client is built
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Model Configuration
//!
//! A [`ModelConfig`] is what the configuration form (or the process
//! configuration) produces. It is never persisted. Before a provider client is
//! created the configuration goes through [`ModelConfig::normalized`], which
//! repairs the common copy/paste mistakes seen in hand-entered base URLs and
//! expands short model aliases.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use url::Url;

use super::types::LlmProviderType;
use crate::constants::providers::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, MODEL_ALIASES};
use crate::errors::{AppError, AppResult, ErrorCode};

/// Connection parameters for one model backend
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which backend to dispatch to
    pub provider: LlmProviderType,
    /// Model identifier
    pub model: String,
    /// API key (never logged in full)
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Completion token limit
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl ModelConfig {
    /// Create a configuration with default token limit and temperature
    #[must_use]
    pub fn new(
        provider: LlmProviderType,
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Configuration using the provider's default model and base URL
    #[must_use]
    pub fn for_provider(provider: LlmProviderType, api_key: impl Into<String>) -> Self {
        Self::new(
            provider,
            provider.default_model(),
            api_key,
            provider.default_base_url(),
        )
    }

    /// Whether an API key has been supplied
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Whether `other` talks to the same provider at the same base URL
    ///
    /// Blank base URLs stand for the provider default. An unparseable URL
    /// never matches.
    #[must_use]
    pub fn same_endpoint(&self, other: &Self) -> bool {
        if self.provider != other.provider {
            return false;
        }
        match (self.endpoint(), other.endpoint()) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    fn endpoint(&self) -> Option<String> {
        match self.base_url.trim() {
            "" => Some(self.provider.default_base_url().to_owned()),
            raw => normalize_base_url(raw).ok(),
        }
    }

    /// Short key prefix safe to write to logs
    #[must_use]
    pub fn redacted_api_key(&self) -> String {
        redact_key(&self.api_key)
    }

    /// Return a cleaned copy ready for client construction
    ///
    /// - trims whitespace from every field
    /// - removes stray `@` characters from the base URL and ensures a trailing `/`
    /// - falls back to the provider default model / base URL when blank
    /// - expands model aliases such as `glm` → `glm-4-flash`
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the base URL is not an absolute http(s) URL
    /// and `MissingCredentials` if no API key is present.
    pub fn normalized(&self) -> AppResult<Self> {
        let api_key = self.api_key.trim().to_owned();
        if api_key.is_empty() {
            return Err(AppError::missing_credentials(self.provider));
        }

        let model = match self.model.trim() {
            "" => self.provider.default_model().to_owned(),
            other => resolve_model_alias(other).to_owned(),
        };

        let base_url = match self.base_url.trim() {
            "" => self.provider.default_base_url().to_owned(),
            other => normalize_base_url(other)?,
        };

        Ok(Self {
            provider: self.provider,
            model,
            api_key,
            base_url,
            max_tokens: if self.max_tokens == 0 {
                DEFAULT_MAX_TOKENS
            } else {
                self.max_tokens
            },
            temperature: if self.temperature.is_finite() && self.temperature >= 0.0 {
                self.temperature
            } else {
                DEFAULT_TEMPERATURE
            },
        })
    }
}

impl Debug for ModelConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.redacted_api_key())
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Expand a short model alias to the identifier the endpoint expects
#[must_use]
pub fn resolve_model_alias(model: &str) -> &str {
    MODEL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == model)
        .map_or(model, |(_, resolved)| resolved)
}

/// Clean a user-entered base URL
///
/// # Errors
///
/// Returns `InvalidFormat` if the cleaned value is not an absolute http(s) URL.
pub fn normalize_base_url(raw: &str) -> AppResult<String> {
    let mut cleaned: String = raw.trim().chars().filter(|c| *c != '@').collect();
    if !cleaned.ends_with('/') {
        cleaned.push('/');
    }

    let parsed = Url::parse(&cleaned).map_err(|e| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("Base URL '{cleaned}' 无效: {e}"),
        )
        .with_source(e)
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::new(
            ErrorCode::InvalidFormat,
            format!("Base URL 必须使用 http 或 https: {cleaned}"),
        ));
    }

    Ok(cleaned)
}

/// First ten characters of a key followed by an ellipsis
#[must_use]
pub fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<none>".to_owned();
    }
    format!("{}...", trimmed.chars().take(10).collect::<String>())
}
