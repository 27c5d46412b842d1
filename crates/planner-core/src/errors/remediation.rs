// ABOUTME: Failure classification for model call errors with tailored remediation hints
// ABOUTME: Maps AppError codes (and message heuristics) to validation, credential and network buckets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Health Planner Contributors

use serde::{Deserialize, Serialize};

use super::{AppError, ErrorCode};

/// User-facing bucket a failure falls into
///
/// Drives the heading and the remediation list rendered under an error panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// No API key was supplied; blocks further actions until one is entered
    MissingCredentials,
    /// The submitted form input was rejected before any model call
    Validation,
    /// The provider client could not be built from the configuration
    Initialization,
    /// Credentials, base URL or model name were rejected by the provider
    Credential,
    /// The provider could not be reached or timed out
    Network,
    /// The provider answered but the content was empty or malformed
    Generation,
    /// Anything else
    Generic,
}

impl FailureCategory {
    /// Classify an error, preferring its code and falling back to message heuristics
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        match error.code {
            ErrorCode::MissingCredentials => Self::MissingCredentials,
            ErrorCode::InvalidInput | ErrorCode::ValueOutOfRange => Self::Validation,
            ErrorCode::InvalidFormat => Self::Initialization,
            ErrorCode::ExternalAuthFailed => Self::Credential,
            ErrorCode::ExternalServiceUnavailable => Self::Network,
            ErrorCode::GenerationFailed => Self::Generation,
            _ => Self::from_message(&error.message),
        }
    }

    /// Heuristic classification of a raw provider error message
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if message.contains("400") || message.contains("InvalidRequest") {
            Self::Credential
        } else if lowered.contains("timeout") || lowered.contains("connection") {
            Self::Network
        } else {
            Self::Generic
        }
    }

    /// Heading shown above the remediation list
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "缺少 API 密钥",
            Self::Validation => "输入有误 - 请修改后重试:",
            Self::Initialization => "模型初始化失败 - 可能的解决方案:",
            Self::Credential => "API 请求错误 - 可能的解决方案:",
            Self::Network => "网络连接问题 - 解决方案:",
            Self::Generation => "模型响应异常 - 解决方案:",
            Self::Generic => "通用解决方案:",
        }
    }

    /// Remediation steps for this category
    #[must_use]
    pub const fn remediation_hints(&self) -> &'static [&'static str] {
        match self {
            Self::MissingCredentials => &[
                "在模型配置中输入 API 密钥",
                "或设置环境变量 API_KEY / OPENAI_API_KEY / GEMINI_API_KEY",
                "或在 secrets.toml 的 [api_keys] 中设置 API_KEY",
            ],
            Self::Validation => &[
                "按照错误详情修改对应的输入后重新提交",
                "年龄 18-100 岁，体重 30-300 kg，身高 150-250 cm",
                "数字字段只能填写数字，可以带小数点",
            ],
            Self::Initialization | Self::Credential => &[
                "检查 API Key 格式是否正确",
                "确认 Base URL 格式正确（不要包含 @ 符号）",
                "验证模型名称是否被 API 提供商支持",
                "确保 API Key 有足够的权限和余额",
            ],
            Self::Network => &["检查网络连接", "尝试重新运行", "确认 API 服务地址正确"],
            Self::Generation => &[
                "重新生成一次计划",
                "确认所选模型支持对话补全",
                "尝试更换其他模型",
            ],
            Self::Generic => &[
                "检查所有配置参数",
                "重新启动应用",
                "联系 API 提供商确认服务状态",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_takes_precedence_over_message() {
        let error = AppError::new(ErrorCode::GenerationFailed, "status 400 timeout");
        assert_eq!(FailureCategory::from_error(&error), FailureCategory::Generation);
    }

    #[test]
    fn test_message_heuristics_for_unclassified_codes() {
        let bad_request = AppError::external_service("OpenAI", "Error code: 400 InvalidRequest");
        assert_eq!(bad_request.category(), FailureCategory::Credential);

        let timeout = AppError::internal("Connection reset by peer");
        assert_eq!(timeout.category(), FailureCategory::Network);

        let other = AppError::internal("something odd");
        assert_eq!(other.category(), FailureCategory::Generic);
    }

    #[test]
    fn test_form_input_errors_are_validation_failures() {
        let bad_number = AppError::invalid_input("年龄无效: 'abc'");
        assert_eq!(bad_number.category(), FailureCategory::Validation);

        let out_of_range = AppError::out_of_range("年龄必须在 18 到 100 之间");
        assert_eq!(out_of_range.category(), FailureCategory::Validation);
        assert_eq!(out_of_range.category().heading(), "输入有误 - 请修改后重试:");
        assert!(!FailureCategory::Validation
            .remediation_hints()
            .iter()
            .any(|hint| hint.contains("重新启动应用")));
    }
}
