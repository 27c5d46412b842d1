// ABOUTME: Configuration management module for process and per-session model settings
// ABOUTME: Handles flags, environment variables, the secrets file and model configuration cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors
//! Configuration module for the health planner
//!
//! - **Environment**: Command-line flags and environment variables
//! - **Model**: Per-session model configuration and normalization
//! - **Secrets**: API keys from a TOML secrets file
//! - **Types**: Provider and configuration-mode enums

/// Flags, environment variables and resolved server configuration
pub mod environment;
/// Per-session model configuration
pub mod model;
/// TOML secrets file
pub mod secrets;
/// Shared configuration enums
pub mod types;

pub use environment::{CliArgs, ServerConfig, EMPTY_API_KEY};
pub use model::{normalize_base_url, redact_key, resolve_model_alias, ModelConfig};
pub use secrets::SecretsFile;
pub use types::{ConfigMode, LlmProviderType};
