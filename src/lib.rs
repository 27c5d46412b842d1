// ABOUTME: Main library entry point for the AI health and fitness planner
// ABOUTME: Wires configuration, LLM providers, planner agents, sessions, views and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![deny(unsafe_code)]

//! # Health Planner
//!
//! A small web application that turns a user profile into a personalized
//! dietary plan and fitness plan using a hosted large language model, then
//! answers follow-up questions about those plans.
//!
//! ## Architecture
//!
//! - **Config**: flags, environment, secrets file and per-session model settings
//! - **LLM**: Gemini and `OpenAI`-compatible chat clients behind [`llm::LlmProvider`]
//! - **Agent**: system prompt + user input → one completion
//! - **Planner**: dietary, fitness and Q&A agents
//! - **Session**: per-browser plans, history and failure reports
//! - **Views / Routes**: server-rendered page and form handlers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use health_planner::config::{CliArgs, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load(CliArgs::parse())?;
//!     health_planner::server::run(config).await
//! }
//! ```

pub use planner_core::{constants, errors, models};

/// Single-shot agent contract over an LLM provider
pub mod agent;
/// Process and session configuration
pub mod config;
/// LLM provider clients and prompts
pub mod llm;
/// Structured logging and the failure journal
pub mod logging;
/// Dietary, fitness and Q&A plan service
pub mod planner;
/// HTTP route handlers
pub mod routes;
/// Router assembly and listener
pub mod server;
/// Per-browser session state
pub mod session;
/// HTML page rendering
pub mod views;
