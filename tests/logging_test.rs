// ABOUTME: Tests for logging configuration, the log file sink and the failure journal
// ABOUTME: Validates environment handling, append-mode files and the journal block format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::fs;

use health_planner::errors::AppError;
use health_planner::logging::{ErrorJournal, LogFormat, LoggingConfig, SERVICE_NAME};
use health_planner::session::{FailureReport, FailureStage};
use serial_test::serial;
use tempfile::TempDir;

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(!config.include_thread);
    assert_eq!(config.service_name, SERVICE_NAME);
    assert!(config.log_file.is_none());

    env::remove_var("RUST_LOG");
    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_INCLUDE_LOCATION");
}

#[test]
#[serial]
fn test_default_logging_config() {
    env::remove_var("LOG_FORMAT");
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));

    let unknown_format = {
        env::set_var("LOG_FORMAT", "xml");
        let config = LoggingConfig::from_env();
        env::remove_var("LOG_FORMAT");
        config.format
    };
    assert_eq!(unknown_format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_init_appends_to_log_file() {
    env::remove_var("RUST_LOG");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.log");
    fs::write(&path, "previous run\n").unwrap();

    let config = LoggingConfig {
        format: LogFormat::Compact,
        ..LoggingConfig::default()
    }
    .with_log_file(&path);
    config.init().unwrap();

    tracing::info!(target: "health_planner", "log file marker");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("previous run\n"));
    assert!(contents.contains("log file marker"));
    assert!(!contents.contains("\u{1b}["), "file output must not contain ANSI codes");

    // A global subscriber can only be installed once
    assert!(config.init().is_err());
}

// =============================================================================
// ErrorJournal
// =============================================================================

#[tokio::test]
async fn test_journal_appends_one_block_per_failure() {
    let dir = TempDir::new().unwrap();
    let journal = ErrorJournal::new(dir.path().join("logs"));

    let first = FailureReport::from_error(
        FailureStage::PlanGeneration,
        &AppError::external_auth("OpenAI", "401 - invalid key"),
    );
    let second = FailureReport::from_error(
        FailureStage::Question,
        &AppError::invalid_input("问题不能为空"),
    );
    journal.record(&first).await;
    journal.record(&second).await;

    let contents = fs::read_to_string(journal.path()).unwrap();
    let header = format!("\n[{}] 计划生成错误: ", first.timestamp_label());
    assert!(contents.starts_with(&header));
    assert!(contents.contains("OpenAI: 401 - invalid key"));
    assert!(contents.contains("堆栈跟踪: ExternalAuthFailed"));
    assert!(contents.contains("问答错误: 问题不能为空"));
    assert_eq!(contents.matches(&"-".repeat(50)).count(), 2);
}

#[tokio::test]
async fn test_journal_write_failure_is_swallowed() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be opened for appending
    let journal = ErrorJournal::new(dir.path());

    let report = FailureReport::from_error(
        FailureStage::Initialization,
        &AppError::missing_credentials("Gemini"),
    );
    journal.record(&report).await;
    assert!(dir.path().is_dir());
}
