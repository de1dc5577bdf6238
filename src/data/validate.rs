use std::collections::HashSet;
use std::fmt;

use crate::data::curve::ProgressionCurveTable;
use crate::data::operator::{
    normalize_name, OperatorCatalog, OperatorDefinition, UpgradeStep, MASTERY_SLOTS,
    MAX_MASTERY_LEVEL, MAX_SKILL_LEVEL,
};
use crate::data::roster::ProgressionInput;

/// Highest promotion stage in the game.
const MAX_ELITE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

fn check_track(
    report: &mut ValidationReport,
    context: &str,
    steps: &[UpgradeStep],
    max_level: u8,
) {
    let mut previous = 0u8;
    for step in steps {
        if step.level == 0 || step.level > max_level {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("step level {} outside 1..={max_level}", step.level),
            );
        }
        if step.level <= previous {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("step level {} does not follow {previous}", step.level),
            );
        }
        if let Some((name, quantity)) = step.cost.negative_entries().first() {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("step {} has negative cost {quantity} for '{name}'", step.level),
            );
        }
        previous = step.level;
    }
}

fn check_definition(report: &mut ValidationReport, definition: &OperatorDefinition) {
    let context = format!("operator '{}'", definition.name);
    if !(1..=6).contains(&definition.stars) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("stars {} outside 1..=6", definition.stars),
        );
    }
    if definition.elite.len() > usize::from(MAX_ELITE) {
        report.push(
            ValidationSeverity::Error,
            context.as_str(),
            format!("{} elite steps, at most {MAX_ELITE} allowed", definition.elite.len()),
        );
    }
    check_track(report, &format!("{context}.elite"), &definition.elite, MAX_ELITE);
    check_track(
        report,
        &format!("{context}.skills.upgrade"),
        &definition.skills.upgrade,
        MAX_SKILL_LEVEL,
    );

    let mut seen_slots = HashSet::new();
    for track in &definition.skills.mastery {
        let track_context = format!("{context}.skills.mastery[s{}]", track.skill);
        if track.skill == 0 || usize::from(track.skill) > MASTERY_SLOTS {
            report.push(
                ValidationSeverity::Error,
                track_context.as_str(),
                format!("skill slot outside 1..={MASTERY_SLOTS}"),
            );
        }
        if !seen_slots.insert(track.skill) {
            report.push(
                ValidationSeverity::Error,
                track_context.as_str(),
                "skill slot listed twice",
            );
        }
        if track.upgrade.len() != usize::from(MAX_MASTERY_LEVEL) {
            report.push(
                ValidationSeverity::Warning,
                track_context.as_str(),
                format!(
                    "{} mastery steps, expected {MAX_MASTERY_LEVEL}",
                    track.upgrade.len()
                ),
            );
        }
        check_track(report, &track_context, &track.upgrade, MAX_MASTERY_LEVEL);
    }
    if !definition.supports_mastery() && !definition.skills.mastery.is_empty() {
        report.push(
            ValidationSeverity::Info,
            context,
            "mastery tracks listed for an operator without masteries; they are ignored",
        );
    }
}

/// Structural checks over every catalog definition.
pub fn validate_catalog(catalog: &OperatorCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    for definition in catalog.definitions() {
        check_definition(&mut report, definition);
    }
    report
}

fn check_input(
    report: &mut ValidationReport,
    definition: &OperatorDefinition,
    curve: &ProgressionCurveTable,
    input: &ProgressionInput,
    context: &str,
) {
    if input.skill_level > MAX_SKILL_LEVEL {
        report.push(
            ValidationSeverity::Error,
            context,
            format!("skill level {} above {MAX_SKILL_LEVEL}", input.skill_level),
        );
    }
    for (index, level) in input.mastery.iter().enumerate() {
        if *level > MAX_MASTERY_LEVEL {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("s{}_mastery {level} above {MAX_MASTERY_LEVEL}", index + 1),
            );
        }
    }

    let has_mastery = input.mastery.iter().any(|level| *level > 0);
    if has_mastery && !definition.supports_mastery() {
        report.push(
            ValidationSeverity::Warning,
            context,
            format!(
                "mastery recorded on a {}-star operator; needed resources will go negative",
                definition.stars
            ),
        );
    } else if has_mastery && input.skill_level < MAX_SKILL_LEVEL {
        report.push(
            ValidationSeverity::Warning,
            context,
            format!(
                "mastery recorded with skill level {} below {MAX_SKILL_LEVEL}",
                input.skill_level
            ),
        );
    }

    match curve.max_position(definition.stars) {
        Ok((max_elite, _)) if input.elite > max_elite => report.push(
            ValidationSeverity::Error,
            context,
            format!(
                "elite {} above the {}-star maximum of {max_elite}",
                input.elite, definition.stars
            ),
        ),
        Ok(_) => {
            if let Some(max_level) = curve.max_level(definition.stars, input.elite) {
                if input.level > max_level {
                    report.push(
                        ValidationSeverity::Error,
                        context,
                        format!(
                            "level {} above the elite {} maximum of {max_level}",
                            input.level, input.elite
                        ),
                    );
                    return;
                }
            }
            if let Err(err) = curve.lookup(definition.stars, input.elite, input.level) {
                report.push(ValidationSeverity::Error, context, err.to_string());
            }
        }
        Err(err) => report.push(ValidationSeverity::Error, context, err.to_string()),
    }
}

/// Cross-check roster rows against the catalog and curve. Anything reported as an error here
/// would also fail record construction.
pub fn validate_roster(
    catalog: &OperatorCatalog,
    curve: &ProgressionCurveTable,
    inputs: &[ProgressionInput],
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();
    for (index, input) in inputs.iter().enumerate() {
        let context = format!("roster[{index}] '{}'", input.name);
        if !seen.insert(normalize_name(&input.name)) {
            report.push(
                ValidationSeverity::Warning,
                context.as_str(),
                "operator listed more than once; each row is counted",
            );
        }
        match catalog.lookup(&input.name) {
            Ok(definition) => check_input(&mut report, definition, curve, input, &context),
            Err(err) => report.push(ValidationSeverity::Error, context, err.to_string()),
        }
    }
    report
}
