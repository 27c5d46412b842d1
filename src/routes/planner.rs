// ABOUTME: Browser-facing planner routes: page, model configuration, plan generation and Q&A
// ABOUTME: Form posts update the caller's session and redirect back to the page (post/redirect/get)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Planner Routes
//!
//! | Method | Path             | Action                                   |
//! |--------|------------------|------------------------------------------|
//! | GET    | `/`              | render the page for the caller's session |
//! | POST   | `/config`        | save the session's model configuration   |
//! | POST   | `/config/test`   | send a test message to the model         |
//! | POST   | `/plans`         | generate dietary and fitness plans       |
//! | POST   | `/questions`     | answer a follow-up question              |
//! | POST   | `/session/reset` | clear plans and Q&A history              |
//!
//! Every POST answers `303 See Other` to `/`. Failures never produce an error
//! status; they are stored in the session and rendered as the error panel.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::agent::GenerationSettings;
use crate::config::{normalize_base_url, ConfigMode, LlmProviderType, ModelConfig};
use crate::errors::{AppError, AppResult};
use crate::llm::ChatProvider;
use crate::models::UserProfile;
use crate::planner::PlanService;
use crate::server::ServerResources;
use crate::session::{
    session_cookie, session_id_from_headers, FailureReport, FailureStage, SessionContext,
};
use crate::views::PageView;

/// Model configuration form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigForm {
    /// `gemini` or `openai`
    #[serde(default)]
    pub provider: String,
    /// Model identifier or alias
    #[serde(default)]
    pub model: String,
    /// API key; blank keeps the current key
    #[serde(default)]
    pub api_key: String,
    /// API base URL; blank selects the provider default
    #[serde(default)]
    pub base_url: String,
}

impl ConfigForm {
    /// Turn the submitted fields into a model configuration
    ///
    /// When the provider changes, a model or base URL that still belongs to
    /// the previous provider is replaced by the new provider's default.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the base URL is not an absolute http(s) URL.
    pub fn into_model_config(
        self,
        current: &ModelConfig,
        stored_key: &str,
    ) -> AppResult<ModelConfig> {
        let provider = LlmProviderType::from_str_or_default(&self.provider);
        let switched = provider != current.provider;

        let model = self.model.trim();
        let model = if model.is_empty()
            || (switched
                && current.provider.model_catalog().contains(&model)
                && !provider.model_catalog().contains(&model))
        {
            provider.default_model().to_owned()
        } else {
            model.to_owned()
        };

        let base_url = match self.base_url.trim() {
            "" => provider.default_base_url().to_owned(),
            raw => {
                let normalized = normalize_base_url(raw)?;
                if switched && normalized == current.provider.default_base_url() {
                    provider.default_base_url().to_owned()
                } else {
                    normalized
                }
            }
        };

        let api_key = match self.api_key.trim() {
            "" => stored_key.trim().to_owned(),
            key => key.to_owned(),
        };

        Ok(ModelConfig::new(provider, model, api_key, base_url))
    }
}

/// Profile form; fields stay strings so bad input reaches the error panel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    /// Age in years
    #[serde(default)]
    pub age: String,
    /// Weight in kilograms
    #[serde(default)]
    pub weight_kg: String,
    /// Height in centimetres
    #[serde(default)]
    pub height_cm: String,
    /// Sex label
    #[serde(default)]
    pub sex: String,
    /// Activity level label
    #[serde(default)]
    pub activity_level: String,
    /// Dietary preference label
    #[serde(default)]
    pub dietary_preference: String,
    /// Fitness goal label
    #[serde(default)]
    pub fitness_goal: String,
}

impl ProfileForm {
    /// Parse and validate the submitted profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for unparseable fields or unknown options and
    /// `ValueOutOfRange` for numbers outside the form bounds.
    pub fn parse(&self) -> AppResult<UserProfile> {
        let age = self
            .age
            .trim()
            .parse::<u8>()
            .map_err(|_| AppError::invalid_input(format!("年龄无效: '{}'", self.age.trim())))?;
        let weight_kg = parse_decimal("体重", &self.weight_kg)?;
        let height_cm = parse_decimal("身高", &self.height_cm)?;

        UserProfile::new(
            age,
            weight_kg,
            height_cm,
            self.sex.parse()?,
            self.activity_level.parse()?,
            self.dietary_preference.parse()?,
            self.fitness_goal.parse()?,
        )
    }
}

fn parse_decimal(field: &str, raw: &str) -> AppResult<f32> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| AppError::invalid_input(format!("{field}无效: '{}'", raw.trim())))
}

/// Follow-up question form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionForm {
    /// Question text
    #[serde(default)]
    pub question: String,
}

/// Session id carried by the request, or a fresh one
#[derive(Debug, Clone, Copy)]
struct SessionHandle {
    id: Uuid,
    is_new: bool,
}

impl SessionHandle {
    fn from_headers(headers: &HeaderMap) -> Self {
        session_id_from_headers(headers).map_or_else(
            || Self {
                id: Uuid::new_v4(),
                is_new: true,
            },
            |id| Self { id, is_new: false },
        )
    }

    /// Attach the session cookie when the browser does not have one yet
    fn bind(self, mut response: Response) -> Response {
        if self.is_new {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(self.id)) {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }
        response
    }

    fn redirect(self) -> Response {
        self.bind(Redirect::to("/").into_response())
    }
}

/// Planner routes
pub struct PlannerRoutes;

impl PlannerRoutes {
    /// Create all planner routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::index))
            .route("/config", post(Self::save_config))
            .route("/config/test", post(Self::test_connection))
            .route("/plans", post(Self::generate_plans))
            .route("/questions", post(Self::ask_question))
            .route("/session/reset", post(Self::reset_session))
            .with_state(resources)
    }

    /// Render the page; the error panel and notice are shown once
    async fn index(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);
        let context = resources.sessions.snapshot(session.id);
        let model = resources.effective_model(&context);

        let html = PageView {
            mode: resources.config.mode,
            model: &model,
            session: &context,
        }
        .render();

        if resources.sessions.contains(session.id) {
            resources
                .sessions
                .update(session.id, SessionContext::clear_feedback);
        }

        session.bind(Html(html).into_response())
    }

    /// Store the session's model configuration (interactive mode only)
    async fn save_config(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Form(form): Form<ConfigForm>,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);

        if resources.config.mode == ConfigMode::Fixed {
            let error = AppError::invalid_input("当前为固定配置模式，模型配置只能通过启动参数修改");
            record_failure(
                &resources,
                session.id,
                FailureStage::Initialization,
                &error,
                None,
            )
            .await;
            return session.redirect();
        }

        let context = resources.sessions.snapshot(session.id);
        let current = resources.effective_model(&context);
        let stored_key = context
            .model_config
            .as_ref()
            .map(|config| config.api_key.as_str())
            .unwrap_or_default();

        match form.into_model_config(&current, stored_key) {
            Ok(config) => {
                info!(
                    provider = %config.provider,
                    model = %config.model,
                    base_url = %config.base_url,
                    api_key = %config.redacted_api_key(),
                    "Session model configuration saved"
                );
                resources.sessions.update(session.id, |context| {
                    context.clear_feedback();
                    context.notice = Some(format!(
                        "✅ 模型配置已保存: {} / {}",
                        config.provider, config.model
                    ));
                    context.model_config = Some(config);
                });
            }
            Err(e) => {
                record_failure(
                    &resources,
                    session.id,
                    FailureStage::Initialization,
                    &e,
                    None,
                )
                .await;
            }
        }

        session.redirect()
    }

    /// Send a short message through the effective configuration
    async fn test_connection(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);
        let context = resources.sessions.snapshot(session.id);
        let model = resources.effective_model(&context);

        let Some(provider) = build_provider(&resources, session.id, &model).await else {
            return session.redirect();
        };

        info!(provider = %model.provider, "Testing API connection");
        match provider.test_connection().await {
            Ok(preview) => {
                info!("API connection test succeeded");
                resources.sessions.update(session.id, |context| {
                    context.clear_feedback();
                    context.notice = Some(format!("✅ API 连接测试成功! 测试响应: {preview}..."));
                });
            }
            Err(e) => {
                record_failure(
                    &resources,
                    session.id,
                    FailureStage::ConnectionTest,
                    &e,
                    None,
                )
                .await;
            }
        }

        session.redirect()
    }

    /// Generate both plans for the submitted profile
    async fn generate_plans(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Form(form): Form<ProfileForm>,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);

        let profile = match form.parse() {
            Ok(profile) => profile,
            Err(e) => {
                record_failure(
                    &resources,
                    session.id,
                    FailureStage::PlanGeneration,
                    &e,
                    None,
                )
                .await;
                return session.redirect();
            }
        };

        let context = resources.sessions.update(session.id, |context| {
            context.clear_feedback();
            context.last_profile = Some(profile.clone());
            context.clone()
        });
        let model = resources.effective_model(&context);

        let Some(provider) = build_provider(&resources, session.id, &model).await else {
            return session.redirect();
        };

        info!(profile = %profile.summary(), "Generating plans");
        let service = PlanService::new(GenerationSettings::from(&model));
        match service.generate(&provider, &profile).await {
            Ok(plans) => resources
                .sessions
                .update(session.id, |context| context.store_plans(plans)),
            Err(e) => {
                record_failure(
                    &resources,
                    session.id,
                    FailureStage::PlanGeneration,
                    &e,
                    Some(&profile),
                )
                .await;
            }
        }

        session.redirect()
    }

    /// Answer a question about the stored plans
    async fn ask_question(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Form(form): Form<QuestionForm>,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);
        let context = resources.sessions.snapshot(session.id);

        let Some((dietary, fitness)) = context.plans() else {
            let error = AppError::invalid_input("请先生成计划，然后再提问");
            record_failure(&resources, session.id, FailureStage::Question, &error, None).await;
            return session.redirect();
        };

        let model = resources.effective_model(&context);
        let Some(provider) = build_provider(&resources, session.id, &model).await else {
            return session.redirect();
        };

        let service = PlanService::new(GenerationSettings::from(&model));
        match service
            .answer(&provider, dietary, fitness, &form.question)
            .await
        {
            Ok(answer) => {
                let question = form.question.trim().to_owned();
                resources.sessions.update(session.id, |context| {
                    context.notice = None;
                    context.push_answer(question, answer);
                });
            }
            Err(e) => {
                record_failure(
                    &resources,
                    session.id,
                    FailureStage::Question,
                    &e,
                    None,
                )
                .await;
            }
        }

        session.redirect()
    }

    /// Forget plans and history, keeping the session's model configuration
    async fn reset_session(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Response {
        let session = SessionHandle::from_headers(&headers);
        let model_config = resources.sessions.snapshot(session.id).model_config;
        resources.sessions.reset(session.id);

        if let Some(config) = model_config {
            resources.sessions.update(session.id, |context| {
                context.model_config = Some(config);
            });
        }
        info!(session = %session.id, "Session reset");

        session.redirect()
    }
}

/// Build the provider for `model`, recording an initialization failure on error
async fn build_provider(
    resources: &ServerResources,
    session_id: Uuid,
    model: &ModelConfig,
) -> Option<ChatProvider> {
    match ChatProvider::from_model_config(model) {
        Ok(provider) => Some(provider),
        Err(e) => {
            record_failure(resources, session_id, FailureStage::Initialization, &e, None).await;
            None
        }
    }
}

/// Log, journal and store a failed action for display on the next page render
async fn record_failure(
    resources: &ServerResources,
    session_id: Uuid,
    stage: FailureStage,
    error: &AppError,
    profile: Option<&UserProfile>,
) {
    let mut report = FailureReport::from_error(stage, error);
    if let Some(profile) = profile {
        report = report.with_profile(profile);
    }

    error!(
        stage = %stage,
        code = ?error.code,
        detail = %report.debug_detail,
        profile = report.profile_summary.as_deref().unwrap_or_default(),
        "{stage}错误: {}",
        error.message
    );
    resources.journal.record(&report).await;
    resources
        .sessions
        .update(session_id, |context| context.record_failure(report));
}
