// ABOUTME: Health planner server binary
// ABOUTME: Parses flags, installs logging, resolves configuration and serves the planner page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Health Planner Server Binary
//!
//! ```text
//! health-planner --model-provider openai --model-name glm \
//!     --base-url https://open.bigmodel.cn/api/paas/v4/ --api-key sk-... --type 1
//! ```

use anyhow::Result;
use clap::Parser;
use health_planner::{
    config::{CliArgs, ServerConfig},
    logging::LoggingConfig,
    server,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    LoggingConfig::from_env()
        .with_log_file(args.log_file.clone())
        .init()?;

    let config = ServerConfig::load(args)?;
    info!("{}", config.summary());

    if let Err(e) = server::run(config).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    info!("Server stopped");
    Ok(())
}
