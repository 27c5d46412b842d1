// ABOUTME: Plan generation and follow-up answering on top of the agent run contract
// ABOUTME: Runs the dietary then fitness agent and wraps their output with static plan text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Plan Service
//!
//! Model calls are sequential: the fitness agent only runs after the dietary
//! agent succeeded, and any failure aborts the whole action so the caller can
//! keep whatever plans it already had.

use tracing::info;

use crate::agent::{Agent, GenerationSettings};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{
    render_followup, render_user_profile, DIETARY_EXPERT_PROMPT, FITNESS_EXPERT_PROMPT,
    QA_EXPERT_PROMPT,
};
use crate::llm::LlmProvider;
use crate::models::{DietaryPlan, FitnessPlan, UserProfile};

/// Both plans produced by one generate action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlans {
    /// Meal plan with boilerplate
    pub dietary: DietaryPlan,
    /// Workout routine with boilerplate
    pub fitness: FitnessPlan,
}

/// Builds agents for each planner role and runs them
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanService {
    settings: GenerationSettings,
}

impl PlanService {
    /// Create a service applying `settings` to every agent
    #[must_use]
    pub const fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    /// Generate the dietary and fitness plans for `profile`
    ///
    /// # Errors
    ///
    /// Returns the first agent failure; no partial result is produced.
    pub async fn generate(
        &self,
        provider: &dyn LlmProvider,
        profile: &UserProfile,
    ) -> AppResult<GeneratedPlans> {
        profile.validate()?;
        let user_profile = render_user_profile(profile);

        let dietary_agent = Agent::new("饮食专家", provider)
            .with_system_prompt(DIETARY_EXPERT_PROMPT)
            .with_settings(self.settings);
        let fitness_agent = Agent::new("健身专家", provider)
            .with_system_prompt(FITNESS_EXPERT_PROMPT)
            .with_settings(self.settings);

        info!("Generating dietary plan");
        let meal_plan = dietary_agent.run(&user_profile).await?;

        info!("Generating fitness plan");
        let routine = fitness_agent.run(&user_profile).await?;

        info!(
            meal_plan_chars = meal_plan.content.chars().count(),
            routine_chars = routine.content.chars().count(),
            "Plans generated"
        );

        Ok(GeneratedPlans {
            dietary: DietaryPlan::from_generated(meal_plan.content),
            fitness: FitnessPlan::from_generated(routine.content),
        })
    }

    /// Answer a follow-up question using the stored plans as context
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank question, otherwise the agent failure.
    pub async fn answer(
        &self,
        provider: &dyn LlmProvider,
        dietary: &DietaryPlan,
        fitness: &FitnessPlan,
        question: &str,
    ) -> AppResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::invalid_input("问题不能为空"));
        }

        let agent = Agent::new("健康顾问", provider)
            .with_system_prompt(QA_EXPERT_PROMPT)
            .with_settings(self.settings);

        let context = render_followup(dietary, fitness, question);
        let response = agent.run(&context).await?;
        Ok(response.content)
    }
}
