// ABOUTME: Session cookie parsing and formatting for the planner's browser sessions
// ABOUTME: Reads the session id from the Cookie header and builds the Set-Cookie value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::constants::session::COOKIE_NAME;

/// Extract the session id from the request's `Cookie` headers
///
/// Malformed ids are ignored so the caller simply starts a new session.
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(extract_session_id)
}

/// Extract the session id from one cookie header value
fn extract_session_id(cookie_header: &str) -> Option<Uuid> {
    cookie_header.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(COOKIE_NAME)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
    })
}

/// `Set-Cookie` value binding the browser to `session_id`
#[must_use]
pub fn session_cookie(session_id: Uuid) -> String {
    format!("{COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
