// ABOUTME: Dietary and fitness plan models pairing model output with static boilerplate
// ABOUTME: Also defines the question/answer pair appended to the session history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use serde::{Deserialize, Serialize};

use crate::constants::plan_text::{
    FITNESS_GOALS, FITNESS_TIPS, IMPORTANT_CONSIDERATIONS, WHY_THIS_PLAN_WORKS,
};

/// Split a multi-line boilerplate field into its non-blank lines
fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Personalized dietary plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryPlan {
    /// Why the plan fits the user (static)
    pub why_this_plan_works: String,
    /// Model-generated meal plan
    pub meal_plan: String,
    /// Things to keep in mind, one per line (static)
    pub important_considerations: String,
}

impl DietaryPlan {
    /// Wrap a generated meal plan with the standard explanation and considerations
    #[must_use]
    pub fn from_generated(meal_plan: impl Into<String>) -> Self {
        Self {
            why_this_plan_works: WHY_THIS_PLAN_WORKS.to_owned(),
            meal_plan: meal_plan.into(),
            important_considerations: IMPORTANT_CONSIDERATIONS.to_owned(),
        }
    }

    /// Considerations as individual non-blank lines
    #[must_use]
    pub fn considerations(&self) -> Vec<&str> {
        non_blank_lines(&self.important_considerations)
    }
}

/// Personalized fitness plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessPlan {
    /// Training goals (static)
    pub goals: String,
    /// Model-generated workout routine
    pub routine: String,
    /// Practical tips, one per line (static)
    pub tips: String,
}

impl FitnessPlan {
    /// Wrap a generated routine with the standard goals and tips
    #[must_use]
    pub fn from_generated(routine: impl Into<String>) -> Self {
        Self {
            goals: FITNESS_GOALS.to_owned(),
            routine: routine.into(),
            tips: FITNESS_TIPS.to_owned(),
        }
    }

    /// Tips as individual non-blank lines
    #[must_use]
    pub fn tips(&self) -> Vec<&str> {
        non_blank_lines(&self.tips)
    }
}

/// A follow-up question and the answer it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// Question asked by the user
    pub question: String,
    /// Model answer
    pub answer: String,
}

impl QaPair {
    /// Create a pair
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}
