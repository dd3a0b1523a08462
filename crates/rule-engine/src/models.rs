//! 规则引擎领域模型

use crate::compiler::CompiledRule;
use crate::strategy::MatchStrategy;
use serde::{Deserialize, Serialize};

/// 未命中任何规则时返回的类别
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// 分类结果的来源标识
pub const ENGINE_SOURCE: &str = "rules";

/// 规则定义（规则表中的一行，已完成规范化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub provider_code: String,
    /// 错误码来源（如 gateway、issuer），仅作记录，不参与匹配
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub regex_hint: String,
    #[serde(default)]
    pub substring_hint: String,
    pub category: String,
    #[serde(default)]
    pub user_message: String,
    /// 处理步骤，顺序即推荐执行顺序
    #[serde(default)]
    pub agent_steps: Vec<String>,
}

impl Rule {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = code.into();
        self
    }

    pub fn with_regex_hint(mut self, pattern: impl Into<String>) -> Self {
        self.regex_hint = pattern.into();
        self
    }

    pub fn with_substring_hint(mut self, hint: impl Into<String>) -> Self {
        self.substring_hint = hint.into();
        self
    }

    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = message.into();
        self
    }

    pub fn with_agent_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.agent_steps = steps.into_iter().map(Into::into).collect();
        self
    }
}

/// 分类请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInput {
    /// 渠道或内部错误码
    #[serde(default)]
    pub raw_code: String,
    /// 原始错误信息
    #[serde(default)]
    pub raw_message: String,
}

impl ErrorInput {
    pub fn new(raw_code: impl Into<String>, raw_message: impl Into<String>) -> Self {
        Self {
            raw_code: raw_code.into(),
            raw_message: raw_message.into(),
        }
    }
}

/// 一次匹配的中间结果，仅在单次分类调用内存在
#[derive(Debug, Clone, Copy)]
pub struct MatchResult<'a> {
    pub rule: &'a CompiledRule,
    pub strategy: MatchStrategy,
    pub confidence: f64,
}

impl<'a> MatchResult<'a> {
    pub fn new(rule: &'a CompiledRule, strategy: MatchStrategy) -> Self {
        Self {
            rule,
            strategy,
            confidence: strategy.confidence(),
        }
    }
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub user_message: String,
    pub agent_steps: Vec<String>,
    pub confidence: f64,
    pub source: String,
}

impl ClassificationResult {
    /// 未命中任何规则时的结果
    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            user_message: String::new(),
            agent_steps: Vec::new(),
            confidence: 0.0,
            source: ENGINE_SOURCE.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == UNKNOWN_CATEGORY
    }
}

impl From<MatchResult<'_>> for ClassificationResult {
    fn from(m: MatchResult<'_>) -> Self {
        let rule = m.rule.rule();
        Self {
            category: rule.category.clone(),
            user_message: rule.user_message.clone(),
            agent_steps: rule.agent_steps.clone(),
            confidence: m.confidence,
            source: ENGINE_SOURCE.to_string(),
        }
    }
}
