//! 匹配策略定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 匹配策略
///
/// 变体按优先级排列，分类时依次尝试，第一个命中的策略生效。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// 错误码精确匹配（大小写不敏感）
    ProviderCode,
    /// 正则提示匹配
    Pattern,
    /// 子串提示匹配
    Substring,
    /// 相似度兜底匹配
    Fuzzy,
}

impl MatchStrategy {
    /// 按优先级排列的全部策略
    pub const ALL: [MatchStrategy; 4] = [
        Self::ProviderCode,
        Self::Pattern,
        Self::Substring,
        Self::Fuzzy,
    ];

    /// 每个策略对应的固定置信度
    pub fn confidence(self) -> f64 {
        match self {
            Self::ProviderCode => 1.0,
            Self::Pattern => 0.95,
            // 模糊匹配不按相似度缩放，与子串同级
            Self::Substring | Self::Fuzzy => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderCode => "provider_code",
            Self::Pattern => "pattern",
            Self::Substring => "substring",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
