//! 支付错误分类规则引擎
//!
//! 将支付渠道返回的错误码/错误信息归类到固定的类别，并给出用户提示与处理步骤：
//! - CSV 规则表加载与规范化
//! - 规则编译（正则预编译、提示词小写化）
//! - 按策略优先级的分层匹配（错误码 → 正则 → 子串 → 模糊相似度）

pub mod compiler;
pub mod engine;
pub mod error;
pub mod loader;
pub mod models;
pub mod similarity;
pub mod store;
pub mod strategy;

pub use compiler::{CompiledRule, RuleCompiler};
pub use engine::{ClassificationEngine, Classifier};
pub use error::{Result, RuleError};
pub use loader::RuleLoader;
pub use models::{
    ClassificationResult, ENGINE_SOURCE, ErrorInput, MatchResult, Rule, UNKNOWN_CATEGORY,
};
pub use similarity::sequence_ratio;
pub use store::{RuleStore, RuleStoreStats};
pub use strategy::MatchStrategy;
