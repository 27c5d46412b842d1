// ABOUTME: Integration tests for the OpenAI-compatible provider against a scripted local upstream
// ABOUTME: Validates configuration, request shape, reply parsing and error classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use health_planner::errors::{ErrorCode, FailureCategory};
use health_planner::llm::{
    ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use helpers::fake_upstream::FakeUpstream;
use serde_json::json;

// =============================================================================
// OpenAiCompatibleConfig Tests
// =============================================================================

#[test]
fn test_openai_config_uses_public_endpoint() {
    let config = OpenAiCompatibleConfig::openai("sk-test");

    assert_eq!(config.base_url, "https://api.openai.com/v1/");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.default_model, "gpt-4o");
    assert_eq!(config.provider_name, "OpenAI");
}

#[test]
fn test_custom_config_treats_empty_key_as_none() {
    let config = OpenAiCompatibleConfig::custom("http://localhost:8000/v1/", "", "glm-4-flash");
    assert!(config.api_key.is_none());
    assert_eq!(config.default_model, "glm-4-flash");
}

#[test]
fn test_config_debug_redacts_key() {
    let config = OpenAiCompatibleConfig::openai("sk-very-secret");
    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-very-secret"));
    assert!(debug.contains("REDACTED"));
}

// =============================================================================
// Completion Tests
// =============================================================================

fn provider(upstream: &FakeUpstream, key: &str) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::custom(
        upstream.base_url.clone(),
        key,
        "glm-4-flash",
    ))
    .unwrap()
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("你是一位专业的健身专家。"),
        ChatMessage::user("健身目标: 增肌"),
    ])
    .with_temperature(0.7)
    .with_max_tokens(2000)
}

#[tokio::test]
async fn test_complete_posts_chat_completion() {
    let upstream = FakeUpstream::start().await;
    upstream.openai_text("热身: 慢跑 5 分钟");

    let response = provider(&upstream, "sk-test").complete(&request()).await.unwrap();
    assert_eq!(response.content, "热身: 慢跑 5 分钟");
    assert_eq!(response.model, "glm-4-flash");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().completion_tokens, 20);

    let sent = upstream.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].path, "/chat/completions");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer sk-test"));

    let body = &sent[0].body;
    assert_eq!(body["model"], "glm-4-flash");
    assert_eq!(body["stream"], false);
    assert_eq!(body["max_tokens"], 2000);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "健身目标: 增肌");
}

#[tokio::test]
async fn test_keyless_endpoint_gets_no_authorization_header() {
    let upstream = FakeUpstream::start().await;
    upstream.openai_text("ok");

    provider(&upstream, "").complete(&request()).await.unwrap();
    assert!(upstream.requests()[0].authorization.is_none());
}

#[tokio::test]
async fn test_response_model_falls_back_to_requested_model() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        200,
        json!({"choices": [{"message": {"content": "答案"}, "finish_reason": null}]}).to_string(),
    );

    let response = provider(&upstream, "sk")
        .complete(&request().with_model("deepseek-v3-241226-volces"))
        .await
        .unwrap();
    assert_eq!(response.model, "deepseek-v3-241226-volces");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_null_content_is_generation_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        200,
        json!({"choices": [{"message": {"content": null}, "finish_reason": "length"}]}).to_string(),
    );

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
}

#[tokio::test]
async fn test_no_choices_is_generation_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(200, json!({"choices": []}).to_string());

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert_eq!(error.category(), FailureCategory::Generation);
}

#[tokio::test]
async fn test_invalid_key_is_credential_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        401,
        json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}})
            .to_string(),
    );

    let error = provider(&upstream, "sk-bad").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("401"));
    assert!(error.message.contains("Incorrect API key provided"));
}

#[tokio::test]
async fn test_rate_limit_reports_retry_delay() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        429,
        json!({"error": {"message": "Rate limit reached. Please try again in 2.5s.", "type": "requests"}})
            .to_string(),
    );

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert_eq!(error.message, "模型接口请求过于频繁，请在 3 秒后重试。");
}

#[tokio::test]
async fn test_unknown_model_is_credential_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        404,
        json!({"error": {"message": "The model `gpt-9` does not exist", "type": "invalid_request_error"}})
            .to_string(),
    );

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("404"));
}

#[tokio::test]
async fn test_other_statuses_are_service_errors() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(500, "internal failure");

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert!(error.message.contains("API error (500)"));
}

#[tokio::test]
async fn test_gateway_html_error_is_service_unavailable() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(503, "<html><body>Service Unavailable</body></html>");

    let error = provider(&upstream, "sk").complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
    assert!(error.message.contains("Service Unavailable"));
}

#[tokio::test]
async fn test_health_check_queries_models_endpoint() {
    let upstream = FakeUpstream::start().await;

    assert!(provider(&upstream, "sk").health_check().await.unwrap());
    let sent = upstream.requests();
    assert_eq!(sent[0].path, "/models");
    assert_eq!(sent[0].authorization.as_deref(), Some("Bearer sk"));
}
