//! Call pipeline throughput benchmark.
//!
//! Measures validation alone, then full execute() for a flat tool and a
//! consolidated tool, using Criterion.

use aidis_core::types::AuditConfig;
use aidis_core::{handler_fn, Config, Dispatcher, Executor, ToolCatalog};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;

fn executor() -> Executor {
    let catalog = Arc::new(ToolCatalog::standard().unwrap());
    let dispatcher = Dispatcher::builder(catalog.clone())
        .fallback(handler_fn(|args| async move { Ok(args) }))
        .build()
        .unwrap();
    let config = Config {
        audit: AuditConfig {
            enabled: false,
            ..AuditConfig::default()
        },
        ..Config::default()
    };
    Executor::new(catalog, dispatcher, &config).unwrap()
}

fn calls() -> Vec<(&'static str, Value)> {
    vec![
        ("aidis_ping", json!({})),
        ("context_search", json!({"query": "authentication flow", "limit": 5, "tags": ["auth", "api"]})),
        (
            "decision_record",
            json!({
                "decisionType": "architecture",
                "title": "Use PostgreSQL",
                "description": "Primary store",
                "rationale": "Mature and well understood",
                "impactLevel": "high",
                "alternativesConsidered": [{"name": "MongoDB", "reasonRejected": "Schema drift"}]
            }),
        ),
        ("pattern_insights", json!({"type": "alerts", "options": {"limit": 20}})),
    ]
}

fn bench_validate(c: &mut Criterion) {
    let catalog = ToolCatalog::standard().unwrap();

    let mut group = c.benchmark_group("validate");
    for (tool, args) in calls() {
        group.bench_with_input(BenchmarkId::from_parameter(tool), &args, |b, a| {
            b.iter(|| catalog.validate(tool, black_box(a)).unwrap())
        });
    }
    group.finish();
}

fn bench_execute(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let executor = executor();

    let mut group = c.benchmark_group("execute");
    for (tool, args) in calls() {
        group.bench_with_input(BenchmarkId::from_parameter(tool), &args, |b, a| {
            b.iter(|| rt.block_on(executor.call(tool, black_box(a.clone()))))
        });
    }
    group.finish();
}

fn bench_unknown_tool(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let executor = executor();

    c.bench_function("execute_unknown_tool", |b| {
        b.iter(|| rt.block_on(executor.call(black_box("no_such_tool"), json!({}))))
    });
}

criterion_group!(benches, bench_validate, bench_execute, bench_unknown_tool);
criterion_main!(benches);
