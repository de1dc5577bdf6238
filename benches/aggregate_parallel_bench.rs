//! Compare sequential vs parallel roster aggregation.
//!
//! Run with: `cargo bench --bench aggregate_parallel`
//! Or quick comparison: `cargo run --bin benchmark_parallel_speedup` (see src/bin)

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arkledger::aggregate::{aggregate_attribute, summarize, Attribute};
use arkledger::data::curve::{CurveRow, ProgressionCurveTable};
use arkledger::data::material::MaterialCatalog;
use arkledger::data::operator::{
    MasteryTrack, OperatorCatalog, OperatorDefinition, SkillTree, UpgradeStep,
};
use arkledger::data::registry::DataRegistry;
use arkledger::data::roster::ProgressionInput;
use arkledger::ledger::ResourceQuantity;
use arkledger::parallel::WorkerPool;
use arkledger::progression::OperatorProgress;

const OPERATORS: usize = 2000;

fn step(level: u8, seed: usize) -> UpgradeStep {
    let cost: ResourceQuantity = (0..4)
        .map(|k| (format!("Material_{}", (seed * 7 + k) % 40), (seed + k) as i64 % 9 + 1))
        .collect();
    UpgradeStep::new(level, cost)
}

/// Synthetic catalog and curve so the bench runs without game data on disk.
fn registry() -> DataRegistry {
    let definitions = (0..OPERATORS).map(|i| OperatorDefinition {
        name: format!("Operator_{i}"),
        stars: 6,
        elite: (1..=2).map(|level| step(level, i + usize::from(level))).collect(),
        skills: SkillTree {
            upgrade: (1..=7).map(|level| step(level, i * 3 + usize::from(level))).collect(),
            mastery: (1..=3)
                .map(|skill| MasteryTrack {
                    skill,
                    upgrade: (1..=3).map(|level| step(level, i + usize::from(skill))).collect(),
                })
                .collect(),
        },
    });
    let curve = (0u8..=2).flat_map(|elite| {
        (1u16..=90).map(move |level| CurveRow {
            rank: 6,
            elite,
            level,
            currency_cost: 120 * i64::from(level),
            experience_cost: 300 * i64::from(level),
            cumulative_currency: None,
            cumulative_experience: None,
        })
    });
    DataRegistry::from_parts(
        OperatorCatalog::from_definitions(definitions).expect("synthetic catalog"),
        ProgressionCurveTable::from_rows(curve).expect("synthetic curve"),
        MaterialCatalog::default(),
    )
}

fn bench_aggregate_sequential_vs_parallel(c: &mut Criterion) {
    let registry = registry();
    let inputs: Vec<ProgressionInput> = (0..OPERATORS)
        .map(|i| {
            ProgressionInput::new(format!("Operator_{i}"))
                .with_level((i % 3) as u8, (i % 90) as u16 + 1)
                .with_skill_level(7)
                .with_mastery(2, (i % 4) as u8)
        })
        .collect();
    let records: Vec<OperatorProgress<'_>> = inputs
        .iter()
        .map(|input| {
            OperatorProgress::new(&registry.operators, &registry.curve, input).expect("record")
        })
        .collect();

    let mut group = c.benchmark_group("aggregate");
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(
                records
                    .iter()
                    .map(|record| record.needed_resources())
                    .sum::<ResourceQuantity>(),
            )
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(aggregate_attribute(&records, Attribute::Needed)));
    });

    group.bench_function("summaries", |b| {
        b.iter(|| black_box(summarize(&records, &WorkerPool::default()).expect("summaries")));
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate_sequential_vs_parallel);
criterion_main!(benches);
