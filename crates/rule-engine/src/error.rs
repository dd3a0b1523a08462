//! 规则引擎错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则数据源不可用: {path} ({reason})")]
    SourceUnavailable { path: String, reason: String },

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("无效的规则: {0}")]
    InvalidRule(String),

    #[error("正则表达式无效: code={code} {reason}")]
    InvalidPattern { code: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RuleError>;
