// ABOUTME: Process configuration from command-line flags, environment variables and secrets file
// ABOUTME: Resolves the default model configuration and the server's bind address and log paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! Process-level configuration
//!
//! API key precedence, highest first: the configuration form (applied per
//! session by the routes), `--api-key`, `PLANNER_API_KEY`, `API_KEY`, the
//! provider's own variable (`GEMINI_API_KEY` / `OPENAI_API_KEY`), and finally
//! the `[api_keys]` table of the secrets file.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use super::model::{normalize_base_url, ModelConfig};
use super::secrets::SecretsFile;
use super::types::{ConfigMode, LlmProviderType};
use crate::constants::files::{DEFAULT_ERROR_JOURNAL, DEFAULT_LOG_FILE, DEFAULT_SECRETS_FILE};
use crate::constants::network::{DEFAULT_HOST, DEFAULT_HTTP_PORT};

/// Placeholder accepted by `--api-key` meaning "no key given"
pub const EMPTY_API_KEY: &str = "EMPTY";

/// Environment variables consulted for the API key, in order
const API_KEY_ENV_VARS: &[&str] = &["PLANNER_API_KEY", "API_KEY"];

/// Command-line flags
#[derive(Debug, Clone, Parser)]
#[command(name = "health-planner")]
#[command(about = "AI health and fitness planner - personalized meal and workout plans")]
pub struct CliArgs {
    /// Model provider: gemini or openai
    #[arg(long = "model-provider", alias = "model_provider")]
    pub model_provider: Option<String>,

    /// Model identifier (aliases such as `glm` are expanded)
    #[arg(long = "model-name", alias = "model_name")]
    pub model_name: Option<String>,

    /// API base URL for the provider
    #[arg(long = "base-url", alias = "base_url")]
    pub base_url: Option<String>,

    /// API key; `EMPTY` means none
    #[arg(long = "api-key", alias = "api_key", default_value = EMPTY_API_KEY)]
    pub api_key: String,

    /// 1 = model fixed by process configuration, 2 = configured in the browser
    #[arg(long = "type", default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub config_type: u8,

    /// Bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(long)]
    pub port: Option<u16>,

    /// TOML file with an `[api_keys]` table
    #[arg(long = "secrets-file", default_value = DEFAULT_SECRETS_FILE)]
    pub secrets_file: PathBuf,

    /// Plain-text application log
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Detailed failure journal
    #[arg(long = "error-journal", default_value = DEFAULT_ERROR_JOURNAL)]
    pub error_journal: PathBuf,
}

impl CliArgs {
    /// The `--api-key` value unless blank or the `EMPTY` placeholder
    #[must_use]
    pub fn explicit_api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty() && key != EMPTY_API_KEY).then_some(key)
    }
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Whether sessions may configure their own model
    pub mode: ConfigMode,
    /// Process-level model configuration; prefills the form in interactive mode
    pub default_model: ModelConfig,
    /// Application log file
    pub log_file: PathBuf,
    /// Failure journal file
    pub error_journal: PathBuf,
}

impl ServerConfig {
    /// Merge flags, environment and secrets file
    ///
    /// # Errors
    ///
    /// Returns an error if the secrets file is unreadable or malformed.
    pub fn load(args: CliArgs) -> Result<Self> {
        info!("Loading configuration from flags and environment");

        let provider = args.model_provider.as_deref().map_or_else(
            || {
                env::var(LlmProviderType::ENV_VAR)
                    .map(|value| LlmProviderType::from_str_or_default(&value))
                    .unwrap_or_default()
            },
            LlmProviderType::from_str_or_default,
        );

        let secrets = SecretsFile::load(&args.secrets_file)?;
        let api_key = resolve_api_key(&args, provider, &secrets).unwrap_or_default();
        if api_key.is_empty() {
            warn!(
                "No API key configured for {provider}; set --api-key, {} or {}",
                API_KEY_ENV_VARS.join(", "),
                provider.api_key_env_var()
            );
        }

        let model = args
            .model_name
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| provider.default_model().to_owned());

        let base_url = match args.base_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => normalize_base_url(raw).context("invalid --base-url")?,
            _ => provider.default_base_url().to_owned(),
        };

        let port = match args.port {
            Some(port) => port,
            None => env::var("PLANNER_PORT")
                .ok()
                .map(|raw| raw.parse::<u16>())
                .transpose()
                .context("Invalid PLANNER_PORT value")?
                .unwrap_or(DEFAULT_HTTP_PORT),
        };

        let host = args
            .host
            .clone()
            .or_else(|| env::var("PLANNER_HOST").ok())
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());

        Ok(Self {
            host,
            port,
            mode: ConfigMode::from_type_flag(args.config_type),
            default_model: ModelConfig::new(provider, model, api_key, base_url),
            log_file: args.log_file,
            error_journal: args.error_journal,
        })
    }

    /// Socket address to bind
    ///
    /// # Errors
    ///
    /// Returns an error if host and port do not form a valid address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Health Planner Configuration:\n\
             - Listen: {}:{}\n\
             - Mode: {}\n\
             - Provider: {}\n\
             - Model: {}\n\
             - Base URL: {}\n\
             - API Key: {}\n\
             - Log File: {}\n\
             - Error Journal: {}",
            self.host,
            self.port,
            self.mode,
            self.default_model.provider,
            self.default_model.model,
            self.default_model.base_url,
            self.default_model.redacted_api_key(),
            self.log_file.display(),
            self.error_journal.display(),
        )
    }
}

/// First non-blank key along the flag → environment → secrets chain
fn resolve_api_key(
    args: &CliArgs,
    provider: LlmProviderType,
    secrets: &SecretsFile,
) -> Option<String> {
    if let Some(key) = args.explicit_api_key() {
        return Some(key.to_owned());
    }

    let provider_var = provider.api_key_env_var();
    API_KEY_ENV_VARS
        .iter()
        .copied()
        .chain(std::iter::once(provider_var))
        .find_map(|name| {
            env::var(name)
                .ok()
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty() && value != EMPTY_API_KEY)
        })
        .or_else(|| {
            secrets
                .resolve(provider_var)
                .map(ToOwned::to_owned)
        })
}
