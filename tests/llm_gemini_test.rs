// ABOUTME: Integration tests for the Gemini provider against a scripted local upstream
// ABOUTME: Covers request shape, reply parsing, quota errors and status classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use health_planner::errors::{ErrorCode, FailureCategory};
use health_planner::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
use helpers::fake_upstream::FakeUpstream;
use serde_json::json;

fn provider(upstream: &FakeUpstream) -> GeminiProvider {
    GeminiProvider::new("gemini-test-key")
        .unwrap()
        .with_base_url(upstream.base_url.clone())
        .with_default_model("gemini-1.5-flash")
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("你是一位专业的饮食专家。"),
        ChatMessage::user("年龄: 30"),
    ])
    .with_model("gemini-1.5-flash")
    .with_temperature(0.7)
    .with_max_tokens(2000)
}

#[tokio::test]
async fn test_complete_sends_system_instruction_and_generation_config() {
    let upstream = FakeUpstream::start().await;
    upstream.gemini_text("早餐: 燕麦粥");

    let response = provider(&upstream).complete(&request()).await.unwrap();
    assert_eq!(response.content, "早餐: 燕麦粥");
    assert_eq!(response.model, "gemini-1.5-flash");
    assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    assert_eq!(response.usage.unwrap().total_tokens, 46);

    let sent = upstream.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].path, "/models/gemini-1.5-flash:generateContent");
    assert_eq!(sent[0].query.as_deref(), Some("key=gemini-test-key"));

    let body = &sent[0].body;
    assert_eq!(
        body["system_instruction"]["parts"][0]["text"],
        "你是一位专业的饮食专家。"
    );
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "年龄: 30");
    assert_eq!(body["generation_config"]["max_output_tokens"], 2000);
    assert_eq!(body["generation_config"]["candidate_count"], 1);
}

#[tokio::test]
async fn test_complete_joins_text_parts() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        200,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": "第一部分"}, {"inlineData": {}}, {"text": "第二部分"}]}
            }]
        })
        .to_string(),
    );

    let response = provider(&upstream).complete(&request()).await.unwrap();
    assert_eq!(response.content, "第一部分第二部分");
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_missing_candidates_is_generation_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(200, json!({"candidates": []}).to_string());

    let error = provider(&upstream).complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert_eq!(error.category(), FailureCategory::Generation);
}

#[tokio::test]
async fn test_blank_text_is_generation_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.gemini_text("   ");

    let error = provider(&upstream).complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
}

#[tokio::test]
async fn test_unparseable_body_is_generation_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(200, "<html>gateway</html>");

    let error = provider(&upstream).complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::GenerationFailed);
    assert!(error.chain_report().contains("caused by"));
}

#[tokio::test]
async fn test_quota_error_reports_retry_delay() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        429,
        json!({"error": {"code": 429, "message": "Quota exceeded. Please retry in 6.406453963s."}})
            .to_string(),
    );

    let error = provider(&upstream).complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert_eq!(error.message, "Gemini 配额已用尽，请在 7 秒后重试。");
}

#[tokio::test]
async fn test_rejected_key_is_credential_failure() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(
        400,
        json!({"error": {"code": 400, "message": "API key not valid."}}).to_string(),
    );

    let error = provider(&upstream).complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("API key not valid."));
    assert_eq!(error.category(), FailureCategory::Credential);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_failure() {
    let provider = GeminiProvider::new("key")
        .unwrap()
        .with_base_url("http://127.0.0.1:9/");

    let error = provider.complete(&request()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(error.category(), FailureCategory::Network);
}

#[tokio::test]
async fn test_health_check_lists_models() {
    let upstream = FakeUpstream::start().await;
    upstream.reply(200, json!({"models": []}).to_string());

    assert!(provider(&upstream).health_check().await.unwrap());
    let sent = upstream.requests();
    assert_eq!(sent[0].path, "/models");
    assert_eq!(sent[0].query.as_deref(), Some("key=gemini-test-key"));
}

#[test]
fn test_debug_output_redacts_key() {
    let provider = GeminiProvider::new("super-secret-key").unwrap();
    let debug = format!("{provider:?}");
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("REDACTED"));
    assert_eq!(provider.name(), "gemini");
    assert!(provider
        .available_models()
        .iter()
        .any(|model| *model == provider.default_model()));
}
