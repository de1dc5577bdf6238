//! Aggregate a synthetic roster once sequentially and once in parallel, then print timings and
//! speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [operators]

use std::time::Instant;

use arkledger::aggregate::{aggregate_attribute, Attribute};
use arkledger::data::curve::{CurveRow, ProgressionCurveTable};
use arkledger::data::material::MaterialCatalog;
use arkledger::data::operator::{
    MasteryTrack, OperatorCatalog, OperatorDefinition, SkillTree, UpgradeStep,
};
use arkledger::data::registry::DataRegistry;
use arkledger::data::roster::ProgressionInput;
use arkledger::ledger::ResourceQuantity;
use arkledger::progression::OperatorProgress;

fn step(level: u8, seed: usize) -> UpgradeStep {
    let cost: ResourceQuantity = (0..4)
        .map(|k| (format!("Material_{}", (seed * 7 + k) % 40), (seed + k) as i64 % 9 + 1))
        .chain([("LMD".to_string(), 1000 * i64::from(level))])
        .collect();
    UpgradeStep::new(level, cost)
}

fn synthetic_registry(operators: usize) -> arkledger::Result<DataRegistry> {
    let definitions = (0..operators).map(|i| OperatorDefinition {
        name: format!("Operator_{i}"),
        stars: 4 + (i % 3) as u8,
        elite: (1..=2).map(|level| step(level, i + usize::from(level))).collect(),
        skills: SkillTree {
            upgrade: (1..=7).map(|level| step(level, i * 3 + usize::from(level))).collect(),
            mastery: (1..=3)
                .map(|skill| MasteryTrack {
                    skill,
                    upgrade: (1..=3)
                        .map(|level| step(level, i * 5 + usize::from(skill * level)))
                        .collect(),
                })
                .collect(),
        },
    });
    let curve_rows = (4u8..=6).flat_map(|rank| {
        (0u8..=2).flat_map(move |elite| {
            (1u16..=80).map(move |level| CurveRow {
                rank,
                elite,
                level,
                currency_cost: 100 * i64::from(level),
                experience_cost: 250 * i64::from(level),
                cumulative_currency: None,
                cumulative_experience: None,
            })
        })
    });
    Ok(DataRegistry::from_parts(
        OperatorCatalog::from_definitions(definitions)?,
        ProgressionCurveTable::from_rows(curve_rows)?,
        MaterialCatalog::default(),
    ))
}

fn main() -> arkledger::Result<()> {
    let operators = std::env::args()
        .nth(1)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(5000);
    let registry = synthetic_registry(operators)?;
    let inputs: Vec<ProgressionInput> = (0..operators)
        .map(|i| {
            ProgressionInput::new(format!("Operator_{i}"))
                .with_level((i % 3) as u8, (i % 80) as u16 + 1)
                .with_skill_level((i % 7) as u8 + 1)
                .with_mastery(1, (i % 4) as u8)
        })
        .collect();
    let records: Vec<OperatorProgress<'_>> = inputs
        .iter()
        .filter_map(|input| {
            OperatorProgress::new(&registry.operators, &registry.curve, input).ok()
        })
        .collect();

    println!("Aggregation: {} operators", records.len());
    println!();

    let t0 = Instant::now();
    let sequential: ResourceQuantity = records.iter().map(|r| r.needed_resources()).sum();
    let seq_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!("Sequential:  {seq_ms:.2} ms");

    let t0 = Instant::now();
    let parallel = aggregate_attribute(&records, Attribute::Needed);
    let par_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!("Parallel:    {par_ms:.2} ms");

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(sequential, parallel, "parallel aggregate differs from sequential");
    println!("(Results match sequential vs parallel)");
    Ok(())
}
