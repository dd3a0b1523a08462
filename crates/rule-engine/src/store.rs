//! 规则存储
//!
//! 启动时一次性构建，之后只读。提供两条访问路径：按加载顺序遍历（用于提示扫描）
//! 和按错误码（大小写不敏感）精确查找。

use crate::compiler::{CompiledRule, RuleCompiler};
use crate::models::Rule;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// 规则存储
#[derive(Debug, Default)]
pub struct RuleStore {
    /// 编译后的规则，保持加载顺序
    rules: Vec<CompiledRule>,
    /// 小写错误码 -> rules 下标
    code_index: HashMap<String, usize>,
    /// 构建时被丢弃的规则数量
    skipped: usize,
}

impl RuleStore {
    /// 从有序规则集合构建存储
    ///
    /// 单条规则无效不会导致构建失败，只会被跳过。重复的错误码以最后加载的规则为准。
    pub fn new(rules: Vec<Rule>) -> Self {
        Self::with_compiler(rules, &RuleCompiler::new())
    }

    #[instrument(skip_all, fields(input = rules.len()))]
    pub fn with_compiler(rules: Vec<Rule>, compiler: &RuleCompiler) -> Self {
        let mut store = Self {
            rules: Vec::with_capacity(rules.len()),
            code_index: HashMap::new(),
            skipped: 0,
        };

        for (row, rule) in rules.into_iter().enumerate() {
            match compiler.compile(rule) {
                Ok(compiled) => store.insert(compiled),
                Err(e) => {
                    warn!(row, error = %e, "跳过无效规则");
                    store.skipped += 1;
                }
            }
        }

        info!(
            "规则存储构建完成: {} 条规则, {} 个错误码, {} 条跳过",
            store.rules.len(),
            store.code_index.len(),
            store.skipped
        );
        store
    }

    fn insert(&mut self, compiled: CompiledRule) {
        let position = self.rules.len();

        if let Some(key) = compiled.provider_key() {
            if let Some(previous) = self.code_index.insert(key.to_string(), position) {
                warn!(
                    provider_code = %compiled.provider_code(),
                    previous,
                    position,
                    "错误码重复，以后加载的规则为准"
                );
            }
        }

        self.rules.push(compiled);
    }

    /// 按错误码精确查找（大小写不敏感）
    pub fn lookup_code(&self, code: &str) -> Option<&CompiledRule> {
        let key = code.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.code_index.get(&key).map(|&i| &self.rules[i])
    }

    /// 按加载顺序遍历规则
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CompiledRule> {
        self.rules.get(index)
    }

    /// 获取当前存储的规则数量
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 构建时被跳过的规则数量
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// 获取规则统计信息
    pub fn stats(&self) -> RuleStoreStats {
        RuleStoreStats {
            rules_count: self.rules.len(),
            indexed_codes: self.code_index.len(),
            pattern_rules: self.rules.iter().filter(|r| r.pattern().is_some()).count(),
            substring_rules: self
                .rules
                .iter()
                .filter(|r| r.substring_key().is_some())
                .count(),
            inert_rules: self.rules.iter().filter(|r| r.is_inert()).count(),
        }
    }
}

/// 规则存储统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStoreStats {
    /// 规则总数
    pub rules_count: usize,
    /// 可精确匹配的错误码数量
    pub indexed_codes: usize,
    /// 带有效正则提示的规则数
    pub pattern_rules: usize,
    /// 带子串提示的规则数
    pub substring_rules: usize,
    /// 没有任何提示的规则数
    pub inert_rules: usize,
}
