// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Form bounds, provider defaults, session settings and static plan boilerplate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Accepted ranges for the profile form
pub mod profile_bounds {
    /// Minimum accepted age in years
    pub const MIN_AGE: u8 = 18;
    /// Maximum accepted age in years
    pub const MAX_AGE: u8 = 100;
    /// Minimum accepted height in centimetres
    pub const MIN_HEIGHT_CM: f32 = 150.0;
    /// Maximum accepted height in centimetres
    pub const MAX_HEIGHT_CM: f32 = 250.0;
    /// Minimum accepted weight in kilograms
    pub const MIN_WEIGHT_KG: f32 = 30.0;
    /// Maximum accepted weight in kilograms
    pub const MAX_WEIGHT_KG: f32 = 300.0;
}

/// Static text that accompanies the model-generated plan sections
pub mod plan_text {
    /// Explanation shown next to every dietary plan
    pub const WHY_THIS_PLAN_WORKS: &str = "高蛋白、健康脂肪、适量碳水化合物和热量平衡";

    /// Considerations shown next to every dietary plan, one per line
    pub const IMPORTANT_CONSIDERATIONS: &str = "\
- 补水：全天多喝水
- 电解质：监测钠、钾和镁的水平
- 纤维：通过蔬菜和水果确保摄入足量
- 倾听身体的声音：根据需要调整份量";

    /// Goals shown next to every fitness plan
    pub const FITNESS_GOALS: &str = "增强力量、提高耐力并保持整体健康";

    /// Tips shown next to every fitness plan, one per line
    pub const FITNESS_TIPS: &str = "\
- 定期跟踪您的进展
- 锻炼之间保证适当的休息
- 注重正确的姿势
- 坚持您的日常锻炼";
}

/// Model provider defaults
pub mod providers {
    /// Gemini REST API base URL
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
    /// Default Gemini model
    pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
    /// Gemini models offered in the configuration form
    pub const GEMINI_MODELS: &[&str] = &[
        "gemini-2.5-flash-preview-05-20",
        "gemini-1.5-pro",
        "gemini-1.5-flash",
        "gemini-pro",
    ];
    /// Where users obtain a Gemini key
    pub const GEMINI_KEY_URL: &str = "https://aistudio.google.com/apikey";

    /// `OpenAI` REST API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
    /// Default `OpenAI`-compatible model
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o";
    /// `OpenAI`-compatible models offered in the configuration form
    pub const OPENAI_MODELS: &[&str] = &[
        "gpt-4o",
        "gpt-4o-mini",
        "gpt-4-turbo",
        "gpt-3.5-turbo",
        "deepseek-v3",
        "glm",
    ];
    /// Where users obtain an `OpenAI` key
    pub const OPENAI_KEY_URL: &str = "https://platform.openai.com/api-keys";

    /// Short model names expanded to the identifiers the endpoints expect
    pub const MODEL_ALIASES: &[(&str, &str)] = &[
        ("deepseek-v3", "deepseek-v3-241226-volces"),
        ("glm", "glm-4-flash"),
    ];

    /// Default completion token limit
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;
    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Connection timeout for provider requests
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Overall request timeout; plan generation can take minutes
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;
}

/// Browser session settings
pub mod session {
    /// Name of the cookie carrying the session id
    pub const COOKIE_NAME: &str = "planner_session";
}

/// Network defaults
pub mod network {
    /// Default bind host
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8501;
}

/// File locations
pub mod files {
    /// Default application log file
    pub const DEFAULT_LOG_FILE: &str = "app.log";
    /// Default detailed error journal
    pub const DEFAULT_ERROR_JOURNAL: &str = "logs";
    /// Default secrets file
    pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
}
