// ABOUTME: Secrets file loading for API keys stored outside the command line
// ABOUTME: Parses the [api_keys] table of a TOML file; a missing file is not an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Key looked up for every provider
pub const GENERIC_KEY_NAME: &str = "API_KEY";

/// Contents of the secrets file
///
/// ```toml
/// [api_keys]
/// API_KEY = "sk-..."
/// GEMINI_API_KEY = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    /// Named API keys
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

impl SecretsFile {
    /// Load secrets from `path`; returns an empty set when the file does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No secrets file");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read secrets file {}", path.display()))
            }
        };

        toml::from_str(&raw)
            .with_context(|| format!("invalid secrets file {}", path.display()))
    }

    /// Non-blank key stored under `name`
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&str> {
        self.api_keys
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Generic `API_KEY` first, then the provider-specific name
    #[must_use]
    pub fn resolve(&self, provider_key_name: &str) -> Option<&str> {
        self.key(GENERIC_KEY_NAME)
            .or_else(|| self.key(provider_key_name))
    }
}
