// ABOUTME: Per-browser session context and the in-memory session store
// ABOUTME: Holds model configuration, generated plans, Q&A history and the last failure report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Sessions
//!
//! Every browser owns one [`SessionContext`], keyed by the id in its session
//! cookie. Nothing is persisted: restarting the server forgets all sessions.
//!
//! Handlers never hold a map guard across a model call. They read a
//! [`SessionStore::snapshot`], await the provider, then apply the outcome with
//! [`SessionStore::update`].

mod cookies;

pub use cookies::{session_cookie, session_id_from_headers};

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Local};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ModelConfig;
use crate::errors::{AppError, FailureCategory};
use crate::models::{DietaryPlan, FitnessPlan, QaPair, UserProfile};
use crate::planner::GeneratedPlans;

/// Which user action failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureStage {
    /// Building the model client from the configuration
    Initialization,
    /// The API connection test
    ConnectionTest,
    /// Generating the dietary and fitness plans
    PlanGeneration,
    /// Answering a follow-up question
    Question,
}

impl FailureStage {
    /// Label used on the page and in the error journal
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Initialization => "初始化",
            Self::ConnectionTest => "API 连接测试",
            Self::PlanGeneration => "计划生成",
            Self::Question => "问答",
        }
    }
}

impl Display for FailureStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the page shows about the last failed action
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Action that failed
    pub stage: FailureStage,
    /// Error message shown prominently
    pub message: String,
    /// Bucket selecting heading and remediation hints
    pub category: FailureCategory,
    /// Remediation steps
    pub hints: Vec<String>,
    /// Error chain shown in the collapsed debug panel
    pub debug_detail: String,
    /// When the failure happened
    pub timestamp: DateTime<Local>,
    /// Profile that was being planned for, if any
    pub profile_summary: Option<String>,
}

impl FailureReport {
    /// Build a report for `error` raised during `stage`
    #[must_use]
    pub fn from_error(stage: FailureStage, error: &AppError) -> Self {
        let category = error.category();
        Self {
            stage,
            message: error.message.clone(),
            category,
            hints: category
                .remediation_hints()
                .iter()
                .map(|hint| (*hint).to_owned())
                .collect(),
            debug_detail: error.chain_report(),
            timestamp: Local::now(),
            profile_summary: None,
        }
    }

    /// Attach the profile summary shown next to plan failures
    #[must_use]
    pub fn with_profile(mut self, profile: &UserProfile) -> Self {
        self.profile_summary = Some(profile.summary());
        self
    }

    /// Heading above the remediation list
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        self.category.heading()
    }

    /// Timestamp formatted as `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn timestamp_label(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// State owned by one browser session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Model configuration entered through the form (interactive mode)
    pub model_config: Option<ModelConfig>,
    /// Last generated dietary plan
    pub dietary_plan: Option<DietaryPlan>,
    /// Last generated fitness plan
    pub fitness_plan: Option<FitnessPlan>,
    /// Follow-up questions and answers for the current plans, oldest first
    pub qa_pairs: Vec<QaPair>,
    /// Last failed action
    pub last_error: Option<FailureReport>,
    /// Last submitted profile, used to refill the form
    pub last_profile: Option<UserProfile>,
    /// One-shot success message (e.g. connection test result)
    pub notice: Option<String>,
}

impl SessionContext {
    /// Whether both plans exist, which enables follow-up questions
    #[must_use]
    pub const fn plans_generated(&self) -> bool {
        self.dietary_plan.is_some() && self.fitness_plan.is_some()
    }

    /// Both plans, when generated
    #[must_use]
    pub fn plans(&self) -> Option<(&DietaryPlan, &FitnessPlan)> {
        self.dietary_plan.as_ref().zip(self.fitness_plan.as_ref())
    }

    /// Replace the plans and start a fresh Q&A history
    pub fn store_plans(&mut self, plans: GeneratedPlans) {
        self.dietary_plan = Some(plans.dietary);
        self.fitness_plan = Some(plans.fitness);
        self.qa_pairs.clear();
        self.last_error = None;
    }

    /// Append an answered question
    pub fn push_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.qa_pairs.push(QaPair::new(question, answer));
        self.last_error = None;
    }

    /// Record a failure, leaving plans and history untouched
    pub fn record_failure(&mut self, report: FailureReport) {
        self.notice = None;
        self.last_error = Some(report);
    }

    /// Drop the error panel and notice before a new action
    pub fn clear_feedback(&mut self) {
        self.last_error = None;
        self.notice = None;
    }
}

/// In-memory map from session id to context
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionContext>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the session's context (empty context for unknown ids)
    #[must_use]
    pub fn snapshot(&self, id: Uuid) -> SessionContext {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Apply `f` to the session's context, creating it if needed
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        let mut entry = self.sessions.entry(id).or_default();
        f(entry.value_mut())
    }

    /// Discard the session's context
    pub fn reset(&self, id: Uuid) {
        self.sessions.remove(&id);
    }

    /// Whether the store knows `id`
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
