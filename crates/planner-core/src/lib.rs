// ABOUTME: Core types and constants for the AI health and fitness planner
// ABOUTME: Foundation crate with error handling, profile and plan models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

#![deny(unsafe_code)]

//! # Planner Core
//!
//! Foundation crate providing shared types for the health planner. This crate
//! changes rarely, so keeping it separate lets the server crate rebuild
//! incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and failure classification
//! - **constants**: Form bounds, provider defaults and static plan text
//! - **models**: User profile, dietary/fitness plans and Q&A history types

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Profile, plan and Q&A data models
pub mod models;
