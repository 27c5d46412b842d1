// ABOUTME: Server-side HTML rendering of the planner page from the session context
// ABOUTME: Fills the page template with configuration, profile form, plans, Q&A and error panels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! # Page Rendering
//!
//! The page is one template with named `{{SLOT}}` markers. Every value that
//! originates from the user or the model is HTML-escaped before insertion.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::{ConfigMode, LlmProviderType, ModelConfig};
use crate::models::{ActivityLevel, DietaryPreference, FitnessGoal, Sex};
use crate::session::{FailureReport, SessionContext};

const PAGE_TEMPLATE: &str = include_str!("../../templates/index.html");

const TEST_CONNECTION_FORM: &str = "<form method=\"post\" action=\"/config/test\">\
     <button type=\"submit\" class=\"secondary\">🧪 测试 API 连接</button></form>";

/// Everything needed to render the page for one session
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    /// Configuration mode of the server
    pub mode: ConfigMode,
    /// Model configuration that the next action would use
    pub model: &'a ModelConfig,
    /// Session state
    pub session: &'a SessionContext,
}

impl PageView<'_> {
    /// Render the complete HTML page
    #[must_use]
    pub fn render(&self) -> String {
        let blocked = !self.model.has_api_key();
        let slots = [
            ("CONFIG_PANEL", self.config_panel()),
            ("NOTICE", self.notice()),
            ("ERROR_PANEL", self.error_panel(blocked)),
            ("PROFILE_FORM", self.profile_form(blocked)),
            ("PLANS", self.plans()),
            ("QUESTION_FORM", self.question_form(blocked)),
            ("QA_HISTORY", self.qa_history()),
        ];
        fill_template(PAGE_TEMPLATE, &slots)
    }

    fn config_panel(&self) -> String {
        let model = self.model;
        if self.mode == ConfigMode::Fixed {
            return format!(
                "<section><h2>⚙️ 模型配置</h2>\
                 <p>提供商: {}<br>模型: {}<br>Base URL: {}</p>{TEST_CONNECTION_FORM}</section>",
                model.provider,
                encode_text(&model.model),
                encode_text(&model.base_url),
            );
        }

        let mut providers = String::new();
        for provider in LlmProviderType::ALL {
            let _ = write!(
                providers,
                "<option value=\"{}\"{}>{}</option>",
                provider.as_str(),
                selected(*provider == model.provider),
                provider.display_name()
            );
        }

        let mut catalog = String::new();
        for name in LlmProviderType::ALL
            .iter()
            .flat_map(|provider| provider.model_catalog())
        {
            let _ = write!(catalog, "<option value=\"{name}\"></option>");
        }

        let key_placeholder = if model.has_api_key() {
            format!("已设置 ({})", model.redacted_api_key())
        } else {
            format!("在此输入您的 {} API 密钥", model.provider)
        };

        format!(
            "<section><h2>⚙️ 模型配置</h2>\
             <form method=\"post\" action=\"/config\">\
             <label for=\"provider\">模型提供商</label>\
             <select id=\"provider\" name=\"provider\">{providers}</select>\
             <label for=\"model\">模型名称</label>\
             <input id=\"model\" name=\"model\" list=\"models\" value=\"{}\">\
             <datalist id=\"models\">{catalog}</datalist>\
             <label for=\"api_key\">API 密钥</label>\
             <input id=\"api_key\" name=\"api_key\" type=\"password\" placeholder=\"{}\">\
             <label for=\"base_url\">Base URL</label>\
             <input id=\"base_url\" name=\"base_url\" value=\"{}\">\
             <p class=\"muted\">获取 API 密钥: <a href=\"{}\" target=\"_blank\">{}</a></p>\
             <button type=\"submit\">保存配置</button>\
             </form>{TEST_CONNECTION_FORM}</section>",
            encode_double_quoted_attribute(&model.model),
            encode_double_quoted_attribute(&key_placeholder),
            encode_double_quoted_attribute(&model.base_url),
            model.provider.key_url(),
            model.provider.key_url(),
        )
    }

    fn notice(&self) -> String {
        self.session
            .notice
            .as_deref()
            .map(|notice| {
                format!(
                    "<section class=\"notice\"><p>{}</p></section>",
                    encode_text(notice)
                )
            })
            .unwrap_or_default()
    }

    fn error_panel(&self, blocked: bool) -> String {
        if let Some(report) = &self.session.last_error {
            return render_failure(report);
        }
        if blocked {
            return format!(
                "<section class=\"error\"><p>⚠️ 请输入您的 {} API 密钥以继续</p></section>",
                self.model.provider
            );
        }
        String::new()
    }

    fn profile_form(&self, blocked: bool) -> String {
        if blocked {
            return String::new();
        }
        let profile = self.session.last_profile.as_ref();
        let age = profile.map_or(25, |p| p.age);
        let weight = profile.map_or(60.0, |p| p.weight_kg);
        let height = profile.map_or(170.0, |p| p.height_cm);

        format!(
            "<section><h2>👤 您的个人资料</h2>\
             <form method=\"post\" action=\"/plans\"><div class=\"grid\"><div>\
             <label for=\"age\">年龄</label>\
             <input id=\"age\" name=\"age\" type=\"number\" min=\"18\" max=\"100\" step=\"1\" value=\"{age}\">\
             <label for=\"height_cm\">身高 (cm)</label>\
             <input id=\"height_cm\" name=\"height_cm\" type=\"number\" min=\"150\" max=\"250\" step=\"0.1\" value=\"{height}\">\
             <label for=\"activity_level\">活动水平</label>\
             <select id=\"activity_level\" name=\"activity_level\">{}</select>\
             <label for=\"dietary_preference\">饮食偏好</label>\
             <select id=\"dietary_preference\" name=\"dietary_preference\">{}</select>\
             </div><div>\
             <label for=\"weight_kg\">体重 (kg)</label>\
             <input id=\"weight_kg\" name=\"weight_kg\" type=\"number\" min=\"30\" max=\"300\" step=\"0.1\" value=\"{weight}\">\
             <label for=\"sex\">性别</label>\
             <select id=\"sex\" name=\"sex\">{}</select>\
             <label for=\"fitness_goal\">健身目标</label>\
             <select id=\"fitness_goal\" name=\"fitness_goal\">{}</select>\
             </div></div>\
             <button type=\"submit\">🎯 生成我的个性化计划</button>\
             </form></section>",
            options(ActivityLevel::ALL, profile.map(|p| p.activity_level), ActivityLevel::label),
            options(
                DietaryPreference::ALL,
                profile.map(|p| p.dietary_preference),
                DietaryPreference::label
            ),
            options(Sex::ALL, profile.map(|p| p.sex), Sex::label),
            options(FitnessGoal::ALL, profile.map(|p| p.fitness_goal), FitnessGoal::label),
        )
    }

    fn plans(&self) -> String {
        let Some((dietary, fitness)) = self.session.plans() else {
            return String::new();
        };

        format!(
            "<section><h2>📋 您的个性化饮食计划</h2>\
             <h3>🎯 为什么这个计划有效</h3><p>{}</p>\
             <h3>🍽️ 膳食计划</h3><div class=\"plan-text\">{}</div>\
             <h3>⚠️ 重要注意事项</h3>{}</section>\
             <section><h2>💪 您的个性化健身计划</h2>\
             <h3>🎯 健身目标</h3><p>{}</p>\
             <h3>🏋️‍♂️ 锻炼计划</h3><div class=\"plan-text\">{}</div>\
             <h3>💡 专业提示</h3>{}</section>",
            encode_text(&dietary.why_this_plan_works),
            encode_text(&dietary.meal_plan),
            bullet_list(&dietary.considerations()),
            encode_text(&fitness.goals),
            encode_text(&fitness.routine),
            bullet_list(&fitness.tips()),
        )
    }

    fn question_form(&self, blocked: bool) -> String {
        if blocked || !self.session.plans_generated() {
            return String::new();
        }
        "<section><h2>❓ 对您的计划有疑问吗？</h2>\
         <form method=\"post\" action=\"/questions\">\
         <label for=\"question\">您想知道什么？</label>\
         <input id=\"question\" name=\"question\" required>\
         <button type=\"submit\">获取答案</button>\
         </form></section>"
            .to_owned()
    }

    fn qa_history(&self) -> String {
        if self.session.qa_pairs.is_empty() {
            return String::new();
        }
        let mut html = String::from("<section><h2>💬 问答历史</h2>");
        for pair in &self.session.qa_pairs {
            let _ = write!(
                html,
                "<p><strong>问:</strong> {}</p><div class=\"plan-text\"><strong>答:</strong> {}</div>",
                encode_text(&pair.question),
                encode_text(&pair.answer)
            );
        }
        html.push_str("</section>");
        html
    }
}

/// Render the failure panel with remediation hints and the collapsed debug detail
fn render_failure(report: &FailureReport) -> String {
    let mut hints = String::new();
    for hint in &report.hints {
        let _ = write!(hints, "<li>{}</li>", encode_text(hint));
    }

    let profile = report
        .profile_summary
        .as_deref()
        .map(|summary| format!("<p><strong>用户配置:</strong> {}</p>", encode_text(summary)))
        .unwrap_or_default();

    format!(
        "<section class=\"error\"><h2>❌ {}时发生错误</h2>\
         <p>错误详情: {}</p>\
         <p><strong>{}</strong></p><ol>{hints}</ol>\
         <details><summary>🔍 详细错误信息（用于调试）</summary>\
         <pre>{}</pre><p><strong>时间戳:</strong> {}</p>{profile}</details></section>",
        report.stage,
        encode_text(&report.message),
        report.heading(),
        encode_text(&report.debug_detail),
        report.timestamp_label(),
    )
}

/// `<option>` list with the current value selected
fn options<T: Copy + PartialEq>(
    all: &[T],
    current: Option<T>,
    label: impl Fn(&T) -> &'static str,
) -> String {
    let mut html = String::new();
    for option in all {
        let text = label(option);
        let _ = write!(
            html,
            "<option value=\"{text}\"{}>{text}</option>",
            selected(current == Some(*option))
        );
    }
    html
}

const fn selected(is_selected: bool) -> &'static str {
    if is_selected {
        " selected"
    } else {
        ""
    }
}

/// Escaped `<ul>` of lines with any leading `- ` marker removed
fn bullet_list(lines: &[&str]) -> String {
    let mut html = String::from("<ul>");
    for line in lines {
        let item = line.strip_prefix('-').map_or(*line, str::trim_start);
        let _ = write!(html, "<li>{}</li>", encode_text(item));
    }
    html.push_str("</ul>");
    html
}

/// Replace `{{NAME}}` markers in one pass so inserted text is never rescanned
fn fill_template(template: &str, slots: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len() + 4096);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            output.push_str(&rest[start..]);
            return output;
        };
        let name = &after[..end];
        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, value)) => output.push_str(value),
            None => output.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    output.push_str(rest);
    output
}
