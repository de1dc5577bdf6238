use chrono::Utc;
use tracing::info;

use crate::aggregate::{summarize, Roster, RosterTotals};
use crate::config::Settings;
use crate::data::inventory::load_owned;
use crate::data::operator::normalize_name;
use crate::data::registry::DataRegistry;
use crate::data::roster::{load_roster, ProgressionInput};
use crate::data::validate::{validate_catalog, validate_roster, ValidationSeverity};
use crate::error::Result;
use crate::parallel::WorkerPool;
use crate::progression::OperatorProgress;
use crate::report::{resource_rows, sort_summaries, write_reports, ReportPaths, RunManifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Report,
    Operator,
    Totals,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("report") => Some(Command::Report),
        Some("operator") => Some(Command::Operator),
        Some("totals") => Some(Command::Totals),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("usage: arkledger <report|operator <name>|totals|validate>");
        return 2;
    };
    if command == Command::Operator && operator_name(args).is_none() {
        eprintln!("usage: arkledger operator <name>");
        return 2;
    }

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    let outcome = match command {
        Command::Report => handle_report(&settings),
        Command::Operator => handle_operator(&settings, operator_name(args).unwrap_or_default()),
        Command::Totals => handle_totals(&settings),
        Command::Validate => handle_validate(&settings),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// Everything after `operator`, so unquoted multi-word names work.
fn operator_name(args: &[String]) -> Option<String> {
    let name = args.get(2..)?.join(" ");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<i32> {
    let payload = serde_json::to_string_pretty(value).map_err(crate::report::ReportError::from)?;
    println!("{payload}");
    Ok(0)
}

fn handle_report(settings: &Settings) -> Result<i32> {
    let registry = DataRegistry::load(settings)?;
    let inputs = load_roster(&settings.roster_path)?;
    let roster = Roster::build(&registry, &inputs, settings.on_unknown)?;
    let pool = WorkerPool::with_workers(settings.workers);

    let mut summaries = summarize(roster.records(), &pool)?;
    sort_summaries(&mut summaries);
    let totals = pool.install(|| RosterTotals::from_records(roster.records()))?;
    let owned = load_owned(&settings.inventory_path, &settings.events_path)?;
    let rows = resource_rows(&totals, &owned, &registry.materials);

    let paths = ReportPaths::new(&settings.reports_dir, Utc::now().date_naive());
    let outputs = write_reports(&paths, &rows, &summaries)?;

    let mut manifest = RunManifest::new(inputs.len());
    manifest.skipped = roster.skipped().to_vec();
    manifest.datasets = registry.datasets.clone();
    manifest.outputs = outputs;
    manifest.write(&paths.manifest())?;
    info!(run_id = %manifest.run_id, "report run complete");

    for output in &manifest.outputs {
        println!("report written: {} ({} rows)", output.path, output.rows);
    }
    Ok(0)
}

fn handle_operator(settings: &Settings, name: String) -> Result<i32> {
    let registry = DataRegistry::load(settings)?;
    let inputs = load_roster(&settings.roster_path)?;
    let key = normalize_name(&name);
    let input = match inputs.into_iter().find(|input| normalize_name(&input.name) == key) {
        Some(input) => input,
        None => {
            info!(operator = %name, "not in roster, reporting from zero progress");
            ProgressionInput::new(name)
        }
    };
    let record = OperatorProgress::new(&registry.operators, &registry.curve, &input)?;
    print_json(&record.summary())
}

fn handle_totals(settings: &Settings) -> Result<i32> {
    let registry = DataRegistry::load(settings)?;
    let inputs = load_roster(&settings.roster_path)?;
    let roster = Roster::build(&registry, &inputs, settings.on_unknown)?;
    let totals = WorkerPool::with_workers(settings.workers)
        .install(|| RosterTotals::from_records(roster.records()))?;
    print_json(&totals)
}

fn handle_validate(settings: &Settings) -> Result<i32> {
    let registry = DataRegistry::load(settings)?;
    let inputs = load_roster(&settings.roster_path)?;

    let mut report = validate_catalog(&registry.operators);
    report.extend(validate_roster(&registry.operators, &registry.curve, &inputs));
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    println!(
        "validation: {} error(s), {} warning(s), {} info",
        report.count(ValidationSeverity::Error),
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info)
    );
    Ok(if report.has_errors() { 1 } else { 0 })
}
