// ABOUTME: System prompts for the planner's agents loaded at compile time
// ABOUTME: Also renders the user profile block and the follow-up question context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy maintenance.
//! The user-side text is always built by the render functions here so the
//! dietary and fitness agents see exactly the same profile block.

use crate::models::{DietaryPlan, FitnessPlan, UserProfile};

/// Dietary expert: produces a one-day meal plan
pub const DIETARY_EXPERT_PROMPT: &str = include_str!("dietary_expert.md");

/// Fitness expert: produces a workout routine
pub const FITNESS_EXPERT_PROMPT: &str = include_str!("fitness_expert.md");

/// Health and fitness expert answering follow-up questions about existing plans
pub const QA_EXPERT_PROMPT: &str = include_str!("qa_expert.md");

/// Minimal instruction used by the connection test
pub const CONNECTION_TESTER_PROMPT: &str = include_str!("connection_tester.md");

/// Render the profile block sent to both plan agents
#[must_use]
pub fn render_user_profile(profile: &UserProfile) -> String {
    format!(
        "年龄: {}\n体重: {}kg\n身高: {}cm\n性别: {}\n活动水平: {}\n饮食偏好: {}\n健身目标: {}",
        profile.age,
        profile.weight_kg,
        profile.height_cm,
        profile.sex,
        profile.activity_level,
        profile.dietary_preference,
        profile.fitness_goal,
    )
}

/// Render the context for a follow-up question
#[must_use]
pub fn render_followup(dietary: &DietaryPlan, fitness: &FitnessPlan, question: &str) -> String {
    format!(
        "饮食计划: {}\n\n健身计划: {}\n用户问题: {question}",
        dietary.meal_plan, fitness.routine
    )
}
