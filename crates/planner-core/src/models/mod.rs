// ABOUTME: Data models for the planner: user profile, dietary and fitness plans, Q&A history
// ABOUTME: Re-exports profile and plan submodules for convenient access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! Planner data models

mod plan;
mod profile;

pub use plan::{DietaryPlan, FitnessPlan, QaPair};
pub use profile::{ActivityLevel, DietaryPreference, FitnessGoal, Sex, UserProfile};
