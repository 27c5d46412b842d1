// ABOUTME: Unified error types with error codes, HTTP status mapping and JSON error bodies
// ABOUTME: Every fallible operation in the planner returns AppResult so failures reach the page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Unified Error Handling System
//!
//! This module provides the error type shared by the planner crates. Model
//! calls, configuration loading and form validation all report an [`AppError`]
//! carrying an [`ErrorCode`]; the web layer turns it into a rendered failure
//! panel (see [`FailureCategory`]) or, for JSON endpoints, an [`ErrorResponse`].

mod remediation;

pub use remediation::FailureCategory;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[cfg(feature = "http-response")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// The data format is invalid
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3001,
    /// A numeric value is outside its accepted range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3002,

    // External Services (5000-5999)
    /// The model provider returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// The model provider could not be reached
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// The model provider rejected the credentials or request
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// The model provider rate limited the request
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// The model answered with an empty or malformed response
    #[serde(rename = "GENERATION_FAILED")]
    GenerationFailed = 5004,

    // Configuration (6000-6999)
    /// No API key was supplied for the selected provider
    #[serde(rename = "MISSING_CREDENTIALS")]
    MissingCredentials = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat | Self::ValueOutOfRange => 400,

            Self::MissingCredentials => 401,

            Self::ExternalServiceError | Self::GenerationFailed => 502,

            Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed
            | Self::ExternalRateLimited => 503,

            Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ExternalServiceError => "The model provider encountered an error",
            Self::ExternalServiceUnavailable => "The model provider is currently unavailable",
            Self::ExternalAuthFailed => "The model provider rejected the request",
            Self::ExternalRateLimited => "The model provider rate limit was exceeded",
            Self::GenerationFailed => "The model returned an empty or malformed response",
            Self::MissingCredentials => "An API key is required for the selected provider",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Classify this error into a user-facing failure category
    #[must_use]
    pub fn category(&self) -> FailureCategory {
        FailureCategory::from_error(self)
    }

    /// Render the message followed by every chained source, one per line
    ///
    /// This is what the collapsible debug panel shows in place of a stack trace.
    #[must_use]
    pub fn chain_report(&self) -> String {
        let mut report = format!("{:?}: {}", self.code, self.message);
        let mut current = self.source.as_deref().map(|s| s as &(dyn StdError + 'static));
        while let Some(err) = current {
            report.push_str("\n  caused by: ");
            report.push_str(&err.to_string());
            current = err.source();
        }
        report
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}

#[cfg(feature = "http-response")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Numeric value outside its accepted range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Missing API key for a provider
    #[must_use]
    pub fn missing_credentials(provider: impl Display) -> Self {
        Self::new(
            ErrorCode::MissingCredentials,
            format!("请输入您的 {provider} API 密钥以继续"),
        )
    }

    /// Empty or malformed model output
    #[must_use]
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailed, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service could not be reached
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service refused the credentials or request
    #[must_use]
    pub fn external_auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalAuthFailed,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let code = if error.is_connect() || error.is_timeout() {
            ErrorCode::ExternalServiceUnavailable
        } else {
            ErrorCode::ExternalServiceError
        };
        Self::new(code, format!("HTTP request failed: {error}")).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::MissingCredentials.http_status(), 401);
        assert_eq!(ErrorCode::GenerationFailed.http_status(), 502);
        assert_eq!(ErrorCode::ExternalAuthFailed.http_status(), 503);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::GenerationFailed).unwrap();
        assert_eq!(json, "\"GENERATION_FAILED\"");
    }

    #[test]
    fn test_display_includes_description_and_message() {
        let error = AppError::invalid_input("age must be a number");
        assert_eq!(
            error.to_string(),
            "The provided input is invalid: age must be a number"
        );
    }

    #[test]
    fn test_chain_report_lists_sources() {
        let error = AppError::external_service("Gemini", "request failed")
            .with_source(io::Error::new(io::ErrorKind::Other, "socket closed"));
        let report = error.chain_report();
        assert!(report.starts_with("ExternalServiceError: Gemini: request failed"));
        assert!(report.contains("caused by: socket closed"));
    }

    #[test]
    fn test_error_response_conversion() {
        let response = ErrorResponse::from(AppError::missing_credentials("Gemini"));
        assert_eq!(response.error.code, ErrorCode::MissingCredentials);
        assert_eq!(response.error.message, "请输入您的 Gemini API 密钥以继续");
    }
}
