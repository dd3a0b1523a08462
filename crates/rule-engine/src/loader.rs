//! 规则加载器
//!
//! 从 CSV 规则表读取规则并做字段规范化。规则表表头：
//! `provider_code,source,regex_hint,substring_hint,category,user_message,agent_steps`，
//! 其中 `agent_steps` 为分号分隔的步骤列表，可带 "1)"、"2." 之类的编号前缀。

use crate::error::{Result, RuleError};
use crate::models::Rule;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// CSV 原始行
#[derive(Debug, Deserialize)]
struct RuleRow {
    #[serde(default)]
    provider_code: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    regex_hint: String,
    #[serde(default)]
    substring_hint: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    user_message: String,
    #[serde(default)]
    agent_steps: String,
}

impl From<RuleRow> for Rule {
    fn from(row: RuleRow) -> Self {
        Self {
            provider_code: row.provider_code.trim().to_string(),
            source: row.source.trim().to_string(),
            regex_hint: row.regex_hint.trim().to_string(),
            substring_hint: row.substring_hint.trim().to_string(),
            category: row.category.trim().to_string(),
            user_message: row.user_message.trim().to_string(),
            agent_steps: RuleLoader::split_steps(&row.agent_steps),
        }
    }
}

/// 规则加载器
pub struct RuleLoader;

impl RuleLoader {
    /// 从文件加载规则
    pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<Rule>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RuleError::SourceUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let rules = Self::load_reader(file)?;
        info!(path = %path.display(), count = rules.len(), "规则表已加载");
        Ok(rules)
    }

    /// 从任意输入流加载规则
    ///
    /// 格式错误的行会被跳过；IO 错误直接返回。
    pub fn load_reader<R: Read>(reader: R) -> Result<Vec<Rule>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let mut rules = Vec::new();
        for (line, record) in csv_reader.deserialize::<RuleRow>().enumerate() {
            match record {
                Ok(row) => rules.push(Rule::from(row)),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    // 表头占第一行
                    warn!(line = line + 2, error = %e, "跳过格式错误的规则行");
                }
            }
        }

        Ok(rules)
    }

    /// 将分号分隔的步骤拆分为有序列表
    pub fn split_steps(raw: &str) -> Vec<String> {
        raw.split(';')
            .map(Self::normalize_step)
            .filter(|step| !step.is_empty())
            .collect()
    }

    /// 去除首尾空白及 "1)"、"1."、"1:" 形式的编号前缀
    pub fn normalize_step(step: &str) -> String {
        let cleaned = step.trim();
        let mut chars = cleaned.chars();

        let numbered = matches!(
            (chars.next(), chars.next(), chars.next()),
            (Some(d), Some(')' | '.' | ':'), Some(_)) if d.is_ascii_digit()
        );

        if numbered {
            cleaned[2..].trim().to_string()
        } else {
            cleaned.to_string()
        }
    }
}
