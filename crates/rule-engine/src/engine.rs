//! 分类引擎
//!
//! 按固定的策略优先级匹配规则，第一个命中的策略生效：
//! 1. 错误码精确匹配（置信度 1.0）
//! 2. 正则提示匹配，按加载顺序取第一条（0.95）
//! 3. 子串提示匹配，按加载顺序取第一条；全部未命中时取相似度最高且不低于 0.6 的规则（0.85）
//! 4. 都未命中返回 UNKNOWN（0.0）

use crate::compiler::CompiledRule;
use crate::error::Result;
use crate::loader::RuleLoader;
use crate::models::{ClassificationResult, ErrorInput, MatchResult, UNKNOWN_CATEGORY};
use crate::similarity::sequence_ratio;
use crate::store::RuleStore;
use crate::strategy::MatchStrategy;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// 模糊匹配的最低相似度（含）
pub const FUZZY_THRESHOLD: f64 = 0.6;

/// 分类器接口，HTTP 层只依赖该抽象
pub trait Classifier: Send + Sync {
    fn classify_input(&self, input: &ErrorInput) -> ClassificationResult;
}

/// 规则分类引擎
///
/// 只读取不可变的规则存储，可在多个线程间共享和克隆。
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    store: Arc<RuleStore>,
}

impl ClassificationEngine {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// 从 CSV 规则表构建引擎
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let rules = RuleLoader::load_path(path)?;
        Ok(Self::new(Arc::new(RuleStore::new(rules))))
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// 对一组错误码与错误信息进行分类
    ///
    /// 输入会先去除首尾空白；未命中任何规则时返回 UNKNOWN，不会失败。
    pub fn classify(&self, raw_code: &str, raw_message: &str) -> ClassificationResult {
        let start = Instant::now();

        let result = match self.explain(raw_code, raw_message) {
            Some(m) => {
                debug!(
                    strategy = %m.strategy,
                    rule = %m.rule.label(),
                    category = %m.rule.category(),
                    "分类命中"
                );
                metrics::counter!(
                    "classifications_total",
                    "strategy" => m.strategy.as_str(),
                    "category" => m.rule.category().to_string()
                )
                .increment(1);
                ClassificationResult::from(m)
            }
            None => {
                debug!("未命中任何规则");
                metrics::counter!(
                    "classifications_total",
                    "strategy" => "none",
                    "category" => UNKNOWN_CATEGORY
                )
                .increment(1);
                ClassificationResult::unknown()
            }
        };

        metrics::histogram!("classification_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        result
    }

    /// 返回命中的规则与策略，不生成最终结果
    pub fn explain(&self, raw_code: &str, raw_message: &str) -> Option<MatchResult<'_>> {
        let raw_code = raw_code.trim();
        let raw_message = raw_message.trim();

        self.match_provider_code(raw_code)
            .or_else(|| self.match_pattern(raw_message))
            .or_else(|| self.match_substring_or_fuzzy(raw_message))
    }

    fn match_provider_code(&self, raw_code: &str) -> Option<MatchResult<'_>> {
        if raw_code.is_empty() {
            return None;
        }

        self.store
            .lookup_code(raw_code)
            .map(|rule| MatchResult::new(rule, MatchStrategy::ProviderCode))
    }

    fn match_pattern(&self, raw_message: &str) -> Option<MatchResult<'_>> {
        if raw_message.is_empty() {
            return None;
        }

        self.store
            .iter()
            .find(|rule| {
                rule.pattern()
                    .is_some_and(|pattern| pattern.is_match(raw_message))
            })
            .map(|rule| MatchResult::new(rule, MatchStrategy::Pattern))
    }

    fn match_substring_or_fuzzy(&self, raw_message: &str) -> Option<MatchResult<'_>> {
        if raw_message.is_empty() {
            return None;
        }

        let message = raw_message.to_lowercase();

        if let Some(rule) = self
            .store
            .iter()
            .find(|rule| rule.substring_key().is_some_and(|hint| message.contains(hint)))
        {
            return Some(MatchResult::new(rule, MatchStrategy::Substring));
        }

        let (best_rule, best_ratio) = self.best_fuzzy(&message)?;
        if best_ratio >= FUZZY_THRESHOLD {
            debug!(rule = %best_rule.label(), ratio = best_ratio, "模糊匹配命中");
            Some(MatchResult::new(best_rule, MatchStrategy::Fuzzy))
        } else {
            None
        }
    }

    /// 相似度最高的规则；并列时取加载顺序靠前的
    fn best_fuzzy(&self, message: &str) -> Option<(&CompiledRule, f64)> {
        let mut best: Option<(&CompiledRule, f64)> = None;

        for rule in self.store.iter() {
            let Some(hint) = rule.substring_key() else {
                continue;
            };
            let ratio = sequence_ratio(hint, message);
            if ratio > best.map_or(0.0, |(_, r)| r) {
                best = Some((rule, ratio));
            }
        }

        best
    }
}

impl Classifier for ClassificationEngine {
    fn classify_input(&self, input: &ErrorInput) -> ClassificationResult {
        self.classify(&input.raw_code, &input.raw_message)
    }
}
