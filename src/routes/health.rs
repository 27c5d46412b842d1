// ABOUTME: Health check and readiness routes for process supervision
// ABOUTME: Readiness probes the configured model provider with a lightweight request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::llm::{ChatProvider, LlmProvider};
use crate::server::ServerResources;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn health_handler() -> Json<Value> {
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(resources)
    }

    /// Check that the process-level model configuration reaches its provider
    async fn ready_handler(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Json<Value>, AppError> {
        let provider = ChatProvider::from_model_config(&resources.config.default_model)?;
        if !provider.health_check().await? {
            warn!(provider = provider.name(), "Provider health check failed");
            return Err(AppError::external_unavailable(
                provider.display_name(),
                "health check failed",
            ));
        }

        Ok(Json(json!({
            "status": "ready",
            "provider": provider.name(),
            "model": provider.default_model(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        })))
    }
}
