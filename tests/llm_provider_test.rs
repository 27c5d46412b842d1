// ABOUTME: Tests for the provider selector built from a session's model configuration
// ABOUTME: Checks variant dispatch, configuration cleanup and the connection test
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use health_planner::config::{LlmProviderType, ModelConfig};
use health_planner::errors::{ErrorCode, FailureCategory};
use health_planner::llm::{ChatProvider, LlmProvider, CONNECTION_TEST_INPUT};
use helpers::fake_upstream::FakeUpstream;

#[test]
fn test_from_model_config_selects_variant() {
    let gemini = ChatProvider::from_model_config(&ModelConfig::for_provider(
        LlmProviderType::Gemini,
        "key",
    ))
    .unwrap();
    assert!(matches!(gemini, ChatProvider::Gemini(_)));
    assert_eq!(gemini.name(), "gemini");

    let openai = ChatProvider::from_model_config(&ModelConfig::for_provider(
        LlmProviderType::OpenAi,
        "key",
    ))
    .unwrap();
    assert!(matches!(openai, ChatProvider::OpenAi(_)));
    assert_eq!(openai.display_name(), "OpenAI Compatible");
}

#[test]
fn test_from_model_config_expands_alias() {
    let config = ModelConfig::new(
        LlmProviderType::OpenAi,
        "glm",
        "key",
        "https://open.bigmodel.cn/api/paas/v4/",
    );
    let provider = ChatProvider::from_model_config(&config).unwrap();
    assert_eq!(provider.default_model(), "glm-4-flash");
}

#[test]
fn test_missing_key_blocks_provider_creation() {
    let config = ModelConfig::for_provider(LlmProviderType::OpenAi, "");
    let error = ChatProvider::from_model_config(&config).err().unwrap();

    assert_eq!(error.code, ErrorCode::MissingCredentials);
    assert_eq!(error.category(), FailureCategory::MissingCredentials);
}

#[test]
fn test_invalid_base_url_is_initialization_failure() {
    let config = ModelConfig::new(LlmProviderType::Gemini, "", "key", "file:///tmp");
    let error = ChatProvider::from_model_config(&config).err().unwrap();

    assert_eq!(error.code, ErrorCode::InvalidFormat);
    assert_eq!(error.category(), FailureCategory::Initialization);
}

#[tokio::test]
async fn test_connection_test_returns_truncated_reply() {
    let upstream = FakeUpstream::start().await;
    let long_reply = "测".repeat(150);
    upstream.openai_text(&long_reply);

    let config = ModelConfig::new(
        LlmProviderType::OpenAi,
        "gpt-4o-mini",
        "sk-test",
        upstream.base_url.as_str(),
    );
    let provider = ChatProvider::from_model_config(&config).unwrap();
    let preview = provider.test_connection().await.unwrap();

    assert_eq!(preview.chars().count(), 100);
    let body = &upstream.bodies()[0];
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][0]["content"], "简短回复测试消息");
    assert_eq!(body["messages"][1]["content"], CONNECTION_TEST_INPUT);
}

#[tokio::test]
async fn test_connection_test_through_gemini_variant() {
    let upstream = FakeUpstream::start().await;
    upstream.gemini_text("你好！");

    let config = ModelConfig::new(
        LlmProviderType::Gemini,
        "gemini-1.5-flash",
        "g-key",
        upstream.base_url.as_str(),
    );
    let provider = ChatProvider::from_model_config(&config).unwrap();
    assert_eq!(provider.test_connection().await.unwrap(), "你好！");
    assert_eq!(
        upstream.requests()[0].path,
        "/models/gemini-1.5-flash:generateContent"
    );
}

#[tokio::test]
async fn test_connection_test_surfaces_empty_reply() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(200, r#"{"choices":[{"message":{"content":""}}]}"#);

    let config = ModelConfig::new(
        LlmProviderType::OpenAi,
        "gpt-4o",
        "sk",
        upstream.base_url.as_str(),
    );
    let provider = ChatProvider::from_model_config(&config).unwrap();
    let error = provider.test_connection().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
}
