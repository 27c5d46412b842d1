// ABOUTME: Route module organization for the health planner HTTP endpoints
// ABOUTME: Groups the browser-facing planner pages and the health/readiness probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! Route module for the health planner
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the planner service, the session store and the page view.

/// Health check and readiness routes
pub mod health;
/// Planner page, configuration, plan generation and Q&A routes
pub mod planner;

/// Health route handlers
pub use health::HealthRoutes;
/// Planner route handlers
pub use planner::{ConfigForm, PlannerRoutes, ProfileForm, QuestionForm};
