// ABOUTME: Scripted fake model API served on an ephemeral local port
// ABOUTME: Records every request and answers with queued Gemini or OpenAI-shaped replies
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One request received by the fake upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct UpstreamState {
    replies: Mutex<VecDeque<(StatusCode, String)>>,
    fallback: Mutex<Option<(StatusCode, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Fake model API; replies are served in order, the last one repeating
#[derive(Clone)]
pub struct FakeUpstream {
    pub base_url: String,
    state: Arc<UpstreamState>,
}

impl FakeUpstream {
    /// Start serving on `127.0.0.1:0`
    pub async fn start() -> Self {
        let state = Arc::new(UpstreamState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/"),
            state,
        }
    }

    /// Queue a reply
    pub fn reply(&self, status: u16, body: impl Into<String>) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back((status, body.into()));
        self
    }

    /// Queue a successful Gemini `generateContent` reply
    pub fn gemini_text(&self, text: &str) -> &Self {
        self.reply(200, gemini_body(text).to_string())
    }

    /// Queue a successful chat completions reply
    pub fn openai_text(&self, text: &str) -> &Self {
        self.reply(200, openai_body(text).to_string())
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Bodies of the requests received so far
    pub fn bodies(&self) -> Vec<Value> {
        self.requests().into_iter().map(|r| r.body).collect()
    }
}

pub fn gemini_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 34,
            "totalTokenCount": 46
        }
    })
}

pub fn openai_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "glm-4-flash",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
    })
}

async fn handle(
    State(state): State<Arc<UpstreamState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_owned(),
        query: uri.query().map(ToOwned::to_owned),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let next = state.replies.lock().unwrap().pop_front();
    let (status, body) = match next {
        Some(reply) => {
            *state.fallback.lock().unwrap() = Some(reply.clone());
            reply
        }
        None => state
            .fallback
            .lock()
            .unwrap()
            .clone()
            .unwrap_or((StatusCode::OK, json!({"data": []}).to_string())),
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body)
}
