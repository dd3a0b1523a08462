//! 规则编译器
//!
//! 将规则表中的行编译为可直接匹配的形式：正则预编译（大小写不敏感）、
//! 错误码与子串提示预先小写化。

use crate::error::{Result, RuleError};
use crate::models::Rule;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// 正则编译后的体积上限
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// 编译后的规则
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// 原始规则
    rule: Rule,
    /// 小写化的错误码，空表示不参与精确匹配
    provider_key: Option<String>,
    /// 预编译的正则，空提示或编译失败时为 None
    pattern: Option<Regex>,
    /// 小写化的子串提示
    substring_key: Option<String>,
}

impl CompiledRule {
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn category(&self) -> &str {
        &self.rule.category
    }

    pub fn provider_code(&self) -> &str {
        &self.rule.provider_code
    }

    pub fn provider_key(&self) -> Option<&str> {
        self.provider_key.as_deref()
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn substring_key(&self) -> Option<&str> {
        self.substring_key.as_deref()
    }

    /// 没有任何可用提示的规则永远不会命中
    pub fn is_inert(&self) -> bool {
        self.provider_key.is_none() && self.pattern.is_none() && self.substring_key.is_none()
    }

    /// 日志中用于标识规则
    pub fn label(&self) -> &str {
        match self.provider_key {
            Some(_) => self.rule.provider_code.trim(),
            None => self.rule.category.trim(),
        }
    }
}

/// 规则编译器
#[derive(Debug, Clone)]
pub struct RuleCompiler {
    pattern_size_limit: usize,
}

impl RuleCompiler {
    pub fn new() -> Self {
        Self {
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }

    pub fn with_pattern_size_limit(mut self, limit: usize) -> Self {
        self.pattern_size_limit = limit;
        self
    }

    /// 编译规则
    ///
    /// 类别为空的规则会被拒绝；正则无效时规则仍然保留，只是不参与正则匹配。
    pub fn compile(&self, rule: Rule) -> Result<CompiledRule> {
        self.validate_rule(&rule)?;

        let provider_key = Self::normalize_key(&rule.provider_code);
        let substring_key = Self::normalize_key(&rule.substring_hint);

        let pattern = match self.compile_pattern(&rule) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(
                    provider_code = %rule.provider_code,
                    category = %rule.category,
                    error = %e,
                    "正则提示无效，该规则将跳过正则匹配"
                );
                None
            }
        };

        Ok(CompiledRule {
            rule,
            provider_key,
            pattern,
            substring_key,
        })
    }

    /// 验证规则结构
    fn validate_rule(&self, rule: &Rule) -> Result<()> {
        if rule.category.trim().is_empty() {
            return Err(RuleError::InvalidRule(format!(
                "规则类别不能为空 (provider_code='{}')",
                rule.provider_code
            )));
        }

        Ok(())
    }

    /// 编译正则提示
    pub fn compile_pattern(&self, rule: &Rule) -> Result<Option<Regex>> {
        let hint = rule.regex_hint.trim();
        if hint.is_empty() {
            return Ok(None);
        }

        RegexBuilder::new(hint)
            .case_insensitive(true)
            .size_limit(self.pattern_size_limit)
            .build()
            .map(Some)
            .map_err(|e| RuleError::InvalidPattern {
                code: rule.provider_code.clone(),
                reason: e.to_string(),
            })
    }

    fn normalize_key(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new()
    }
}
