// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, sample profiles and server configurations pointing at fakes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `health_planner`

use std::path::Path;
use std::sync::{Arc, Once};

use health_planner::config::{ConfigMode, LlmProviderType, ModelConfig, ServerConfig};
use health_planner::models::{
    ActivityLevel, DietaryPreference, FitnessGoal, Sex, UserProfile,
};
use health_planner::server::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Profile used across planner tests
pub fn sample_profile() -> UserProfile {
    UserProfile::new(
        30,
        70.0,
        175.0,
        Sex::Male,
        ActivityLevel::ModeratelyActive,
        DietaryPreference::Balanced,
        FitnessGoal::MuscleGain,
    )
    .unwrap()
}

/// Form fields matching [`sample_profile`]
pub fn sample_profile_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("age", "30"),
        ("weight_kg", "70"),
        ("height_cm", "175"),
        ("sex", "男性"),
        ("activity_level", "中度活跃"),
        ("dietary_preference", "荤素搭配"),
        ("fitness_goal", "增肌"),
    ]
}

/// Model configuration pointing at a fake upstream
pub fn fake_model(provider: LlmProviderType, base_url: &str, api_key: &str) -> ModelConfig {
    ModelConfig::new(provider, provider.default_model(), api_key, base_url)
}

/// Server configuration whose journal lives in `dir`
pub fn server_config(mode: ConfigMode, default_model: ModelConfig, dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        mode,
        default_model,
        log_file: dir.join("app.log"),
        error_journal: dir.join("logs"),
    }
}

/// Shared resources for route tests
pub fn resources(config: ServerConfig) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(config))
}
