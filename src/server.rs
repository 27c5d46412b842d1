// ABOUTME: HTTP server assembly for the planner: shared resources, router and listener
// ABOUTME: Merges the planner and health routes, adds request tracing and serves on the bind address
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{ConfigMode, ModelConfig, ServerConfig};
use crate::logging::ErrorJournal;
use crate::routes::{HealthRoutes, PlannerRoutes};
use crate::session::{SessionContext, SessionStore};

/// Shared state handed to every route
#[derive(Debug)]
pub struct ServerResources {
    /// Resolved process configuration
    pub config: Arc<ServerConfig>,
    /// In-memory browser sessions
    pub sessions: SessionStore,
    /// Failure journal
    pub journal: ErrorJournal,
}

impl ServerResources {
    /// Create resources with an empty session store
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let journal = ErrorJournal::new(&config.error_journal);
        Self {
            config: Arc::new(config),
            sessions: SessionStore::new(),
            journal,
        }
    }

    /// Model configuration the next action of `session` would use
    ///
    /// Fixed mode always uses the process configuration. In interactive mode
    /// the session's own configuration wins. A blank session key only borrows
    /// the process key when the session targets the process provider and base
    /// URL; anywhere else the key stays blank and the action reports missing
    /// credentials.
    #[must_use]
    pub fn effective_model(&self, session: &SessionContext) -> ModelConfig {
        let defaults = &self.config.default_model;
        match (self.config.mode, &session.model_config) {
            (ConfigMode::Interactive, Some(config)) => {
                let mut config = config.clone();
                if !config.has_api_key() && config.same_endpoint(defaults) {
                    config.api_key.clone_from(&defaults.api_key);
                }
                config
            }
            _ => defaults.clone(),
        }
    }
}

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(PlannerRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process is stopped
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the server fails.
pub async fn run(config: ServerConfig) -> Result<()> {
    let addr = config.bind_address()?;
    let resources = Arc::new(ServerResources::new(config));
    let app = build_router(resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Health planner listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
