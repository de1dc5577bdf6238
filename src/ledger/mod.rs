//! Resource ledger: pure functions turning an operator definition and a progression cutoff into
//! [ResourceQuantity] values.

mod cost;
mod quantity;

pub use cost::{
    elite_stage_cost, full_elite_cost, full_mastery_cost, full_skill_cost, mastery_level_for,
    spent_elite_cost, spent_mastery_cost, spent_skill_cost,
};
pub use quantity::{combine, material_quantity, subtract, ResourceQuantity};

/// Resource name of the in-game currency. Never counted as a material.
pub const CURRENCY: &str = "LMD";
