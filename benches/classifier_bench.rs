//! 分类引擎性能基准测试
//!
//! 测试覆盖：
//! - 各匹配策略（错误码、正则、子串、模糊、未命中）的单次分类耗时
//! - 规则数量增长时未命中路径（全表模糊扫描）的性能曲线
//! - 相似度计算在不同文本长度下的耗时

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rule_engine::{ClassificationEngine, Rule, RuleStore, sequence_ratio};
use std::hint::black_box;
use std::path::PathBuf;
use std::sync::Arc;

fn mappings_engine() -> ClassificationEngine {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/mappings.csv");
    ClassificationEngine::from_path(path).unwrap()
}

/// 生成指定数量的合成规则，每条都带正则和子串提示
fn synthetic_engine(rule_count: usize) -> ClassificationEngine {
    let rules = (0..rule_count)
        .map(|i| {
            Rule::new(format!("CATEGORY_{}", i % 10))
                .with_provider_code(format!("CODE_{}", i))
                .with_regex_hint(format!(r"provider error {}\b", i))
                .with_substring_hint(format!("synthetic failure number {}", i))
                .with_user_message("Synthetic rule")
                .with_agent_steps(["Retry"])
        })
        .collect();

    ClassificationEngine::new(Arc::new(RuleStore::new(rules)))
}

// ============================================================================
// 基准测试函数
// ============================================================================

/// 各策略的单次分类耗时
fn bench_strategies(c: &mut Criterion) {
    let engine = mappings_engine();
    let mut group = c.benchmark_group("classify_strategy");

    let cases = [
        ("provider_code", "CARD_EXPIRED", ""),
        ("pattern", "", "Gateway timed out while waiting for issuer"),
        ("substring", "", "Customer says the gateway down again"),
        ("fuzzy", "", "This is about gating down"),
        ("unknown", "", "mystery"),
    ];

    for (name, code, message) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &(code, message), |b, input| {
            b.iter(|| black_box(engine.classify(black_box(input.0), black_box(input.1))))
        });
    }

    group.finish();
}

/// 未命中路径随规则数量的变化
fn bench_rule_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_unknown_by_rule_count");

    for rule_count in [10, 100, 1000].iter() {
        let engine = synthetic_engine(*rule_count);

        group.throughput(Throughput::Elements(*rule_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(rule_count),
            rule_count,
            |b, _| b.iter(|| black_box(engine.classify("", black_box("completely unrelated text")))),
        );
    }

    group.finish();
}

/// 相似度计算耗时（不同文本长度）
fn bench_sequence_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_ratio");

    for len in [16, 64, 256].iter() {
        let a: String = "payment gateway timeout ".chars().cycle().take(*len).collect();
        let b: String = "payment gateway shutdown ".chars().cycle().take(*len).collect();

        group.throughput(Throughput::Bytes(*len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bench, input| {
            bench.iter(|| black_box(sequence_ratio(black_box(&input.0), black_box(&input.1))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_rule_count, bench_sequence_ratio);

criterion_main!(benches);
