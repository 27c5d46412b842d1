// ABOUTME: Shared configuration enums for provider selection and configuration mode
// ABOUTME: Contains LlmProviderType and ConfigMode parsed from flags, env vars and forms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::providers::{
    GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GEMINI_KEY_URL, GEMINI_MODELS, OPENAI_BASE_URL,
    OPENAI_DEFAULT_MODEL, OPENAI_KEY_URL, OPENAI_MODELS,
};

/// LLM provider selection
///
/// Only two backends exist; supporting a third means adding a variant here and
/// a matching arm in `ChatProvider::from_model_config`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Google Gemini via the Generative Language API (default)
    #[default]
    Gemini,
    /// Any `OpenAI`-compatible chat completions endpoint
    #[serde(rename = "openai")]
    OpenAi,
}

impl LlmProviderType {
    /// Environment variable for provider selection
    pub const ENV_VAR: &'static str = "PLANNER_MODEL_PROVIDER";

    /// Every provider in form order
    pub const ALL: &'static [Self] = &[Self::Gemini, Self::OpenAi];

    /// Parse from string with fallback to default
    ///
    /// Accepts the legacy numeric selectors `1` (Gemini) and `2` (`OpenAI`).
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" | "openai-compatible" | "openai_compatible" | "local" | "2" => Self::OpenAi,
            _ => Self::Gemini, // Default fallback (including "gemini", "google", "1")
        }
    }

    /// Stable identifier used in forms and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }

    /// Name shown to users
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Model used when none is configured
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_DEFAULT_MODEL,
            Self::OpenAi => OPENAI_DEFAULT_MODEL,
        }
    }

    /// API base URL used when none is configured
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_BASE_URL,
            Self::OpenAi => OPENAI_BASE_URL,
        }
    }

    /// Models offered in the configuration form
    #[must_use]
    pub const fn model_catalog(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => GEMINI_MODELS,
            Self::OpenAi => OPENAI_MODELS,
        }
    }

    /// Page where a user can create an API key
    #[must_use]
    pub const fn key_url(&self) -> &'static str {
        match self {
            Self::Gemini => GEMINI_KEY_URL,
            Self::OpenAi => OPENAI_KEY_URL,
        }
    }

    /// Provider-specific environment variable holding the API key
    #[must_use]
    pub const fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.display_name())
    }
}

/// Where the model configuration comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    /// Process configuration (flags, env, secrets file) fixes the model; no form
    Fixed,
    /// Each browser session configures its own model through the form (default)
    #[default]
    Interactive,
}

impl ConfigMode {
    /// Map the legacy `--type` selector (1 = fixed, anything else = interactive)
    #[must_use]
    pub const fn from_type_flag(value: u8) -> Self {
        if value == 1 {
            Self::Fixed
        } else {
            Self::Interactive
        }
    }
}

impl Display for ConfigMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Interactive => write!(f, "interactive"),
        }
    }
}
