//! Operator progression record: one roster row joined with its catalog definition and curve
//! positions. Every derived value is recomputed from the ledger on each call.

use serde::Serialize;

use crate::data::curve::{CurvePoint, ProgressionCurveTable};
use crate::data::operator::{OperatorCatalog, OperatorDefinition, MASTERY_SLOTS};
use crate::data::roster::ProgressionInput;
use crate::error::LookupError;
use crate::ledger::{
    combine, elite_stage_cost, full_elite_cost, full_mastery_cost, full_skill_cost,
    material_quantity, spent_elite_cost, spent_mastery_cost, spent_skill_cost, subtract,
    ResourceQuantity,
};

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `spent / total` as a percentage rounded to two decimals; 100 when there is nothing to spend.
pub fn percentage(spent: i64, total: i64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    round2(spent as f64 / total as f64 * 100.0)
}

fn material_share(spent: &ResourceQuantity, total: &ResourceQuantity) -> f64 {
    percentage(material_quantity(spent), material_quantity(total))
}

/// Rounded mean of the three completion percentages.
fn overall(material: f64, currency: f64, exp_tickets: f64) -> f64 {
    round2((material + currency + exp_tickets) / 3.0)
}

#[derive(Debug, Clone)]
pub struct OperatorProgress<'a> {
    definition: &'a OperatorDefinition,
    level: u16,
    elite: u8,
    skill_level: u8,
    mastery: [u8; MASTERY_SLOTS],
    current: CurvePoint,
    max: CurvePoint,
}

impl<'a> OperatorProgress<'a> {
    /// Resolve `input` against the catalog and curve. Fails when the name is unknown or the curve
    /// has no point for the current or maximum position of the operator's rank.
    pub fn new(
        catalog: &'a OperatorCatalog,
        curve: &ProgressionCurveTable,
        input: &ProgressionInput,
    ) -> Result<Self, LookupError> {
        let definition = catalog.lookup(&input.name)?;
        Self::with_definition(definition, curve, input)
    }

    pub fn with_definition(
        definition: &'a OperatorDefinition,
        curve: &ProgressionCurveTable,
        input: &ProgressionInput,
    ) -> Result<Self, LookupError> {
        let max = curve.max_point(definition.stars)?;
        let current = curve.lookup(definition.stars, input.elite, input.level)?;
        Ok(Self {
            definition,
            level: input.level,
            elite: input.elite,
            skill_level: input.skill_level,
            mastery: input.mastery,
            current,
            max,
        })
    }

    pub fn definition(&self) -> &'a OperatorDefinition {
        self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn stars(&self) -> u8 {
        self.definition.stars
    }

    pub fn current_point(&self) -> CurvePoint {
        self.current
    }

    pub fn max_point(&self) -> CurvePoint {
        self.max
    }

    pub fn total_resources(&self) -> ResourceQuantity {
        combine([
            &full_skill_cost(self.definition),
            &full_elite_cost(self.definition),
            &full_mastery_cost(self.definition),
        ])
    }

    pub fn spent_resources(&self) -> ResourceQuantity {
        combine([
            &spent_skill_cost(self.definition, self.skill_level),
            &spent_elite_cost(self.definition, self.elite),
            &spent_mastery_cost(self.definition, &self.mastery),
        ])
    }

    /// Never clamped: an inconsistent record shows up as negative entries.
    pub fn needed_resources(&self) -> ResourceQuantity {
        subtract(&self.total_resources(), &self.spent_resources())
    }

    pub fn material_percentage(&self) -> f64 {
        material_share(&self.spent_resources(), &self.total_resources())
    }

    pub fn total_currency(&self) -> i64 {
        self.max.cumulative_currency
    }

    pub fn spent_currency(&self) -> i64 {
        self.current.cumulative_currency
    }

    pub fn needed_currency(&self) -> i64 {
        self.total_currency() - self.spent_currency()
    }

    pub fn currency_percentage(&self) -> f64 {
        percentage(self.spent_currency(), self.total_currency())
    }

    /// LMD paid for promotions so far. Separate from, and additive with, the curve figure.
    pub fn spent_elite_currency(&self) -> i64 {
        spent_elite_cost(self.definition, self.elite).currency()
    }

    pub fn total_elite_currency(&self) -> i64 {
        full_elite_cost(self.definition).currency()
    }

    pub fn total_exp_tickets(&self) -> i64 {
        self.max.experience_tickets()
    }

    pub fn spent_exp_tickets(&self) -> i64 {
        self.current.experience_tickets()
    }

    pub fn needed_exp_tickets(&self) -> i64 {
        self.total_exp_tickets() - self.spent_exp_tickets()
    }

    pub fn exp_ticket_percentage(&self) -> f64 {
        percentage(self.spent_exp_tickets(), self.total_exp_tickets())
    }

    /// Mean of the material, currency and EXP ticket percentages.
    pub fn overall_percentage(&self) -> f64 {
        overall(
            self.material_percentage(),
            self.currency_percentage(),
            self.exp_ticket_percentage(),
        )
    }

    pub fn summary(&self) -> OperatorSummary {
        let total = self.total_resources();
        let spent = self.spent_resources();
        let needed = subtract(&total, &spent);
        let material_percentage = material_share(&spent, &total);
        let currency_percentage = self.currency_percentage();
        let exp_ticket_percentage = self.exp_ticket_percentage();

        OperatorSummary {
            name: self.definition.name.clone(),
            stars: self.definition.stars,
            level: self.level,
            elite: self.elite,
            skill_level: self.skill_level,
            mastery: self.mastery,
            overall_percentage: overall(
                material_percentage,
                currency_percentage,
                exp_ticket_percentage,
            ),
            material_percentage,
            currency_percentage,
            exp_ticket_percentage,
            skill_upgrade_resources: full_skill_cost(self.definition),
            elite1_resources: elite_stage_cost(self.definition, 1),
            elite2_resources: elite_stage_cost(self.definition, 2),
            elite_resources: full_elite_cost(self.definition),
            mastery_resources: full_mastery_cost(self.definition),
            total_material_quantity: material_quantity(&total),
            spent_material_quantity: material_quantity(&spent),
            needed_material_quantity: material_quantity(&needed),
            total_resources: total,
            spent_resources: spent,
            needed_resources: needed,
            total_currency: self.total_currency(),
            spent_currency: self.spent_currency(),
            needed_currency: self.needed_currency(),
            total_elite_currency: self.total_elite_currency(),
            spent_elite_currency: self.spent_elite_currency(),
            total_exp_tickets: self.total_exp_tickets(),
            spent_exp_tickets: self.spent_exp_tickets(),
            needed_exp_tickets: self.needed_exp_tickets(),
        }
    }
}

/// Every derived value of one record, flattened for reports and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorSummary {
    pub name: String,
    pub stars: u8,
    pub level: u16,
    pub elite: u8,
    pub skill_level: u8,
    pub mastery: [u8; MASTERY_SLOTS],
    pub overall_percentage: f64,
    pub material_percentage: f64,
    pub currency_percentage: f64,
    pub exp_ticket_percentage: f64,
    pub skill_upgrade_resources: ResourceQuantity,
    pub elite1_resources: ResourceQuantity,
    pub elite2_resources: ResourceQuantity,
    pub elite_resources: ResourceQuantity,
    pub mastery_resources: ResourceQuantity,
    pub total_resources: ResourceQuantity,
    pub spent_resources: ResourceQuantity,
    pub needed_resources: ResourceQuantity,
    pub total_material_quantity: i64,
    pub spent_material_quantity: i64,
    pub needed_material_quantity: i64,
    pub total_currency: i64,
    pub spent_currency: i64,
    pub needed_currency: i64,
    pub total_elite_currency: i64,
    pub spent_elite_currency: i64,
    pub total_exp_tickets: i64,
    pub spent_exp_tickets: i64,
    pub needed_exp_tickets: i64,
}
