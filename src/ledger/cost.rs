//! Cost walks over an operator's upgrade tree.
//!
//! "Full" walks sum a whole track. "Spent" walks are prefix sums: steps are taken in order and the
//! walk stops at the first step whose level exceeds the recorded progress, so a step at exactly
//! the recorded level is included.

use crate::data::operator::{OperatorDefinition, UpgradeStep, MASTERY_SLOTS};

use super::quantity::ResourceQuantity;

fn sum_steps<'a>(steps: impl IntoIterator<Item = &'a UpgradeStep>) -> ResourceQuantity {
    steps.into_iter().map(|step| &step.cost).sum()
}

fn sum_prefix(steps: &[UpgradeStep], reached: u8) -> ResourceQuantity {
    sum_steps(steps.iter().take_while(|step| step.level <= reached))
}

pub fn full_elite_cost(definition: &OperatorDefinition) -> ResourceQuantity {
    sum_steps(&definition.elite)
}

pub fn spent_elite_cost(definition: &OperatorDefinition, current_stage: u8) -> ResourceQuantity {
    sum_prefix(&definition.elite, current_stage)
}

/// Cost of a single promotion stage (1 or 2); empty when the catalog has no such stage.
pub fn elite_stage_cost(definition: &OperatorDefinition, stage: u8) -> ResourceQuantity {
    sum_steps(definition.elite.iter().filter(|step| step.level == stage))
}

pub fn full_skill_cost(definition: &OperatorDefinition) -> ResourceQuantity {
    sum_steps(&definition.skills.upgrade)
}

pub fn spent_skill_cost(definition: &OperatorDefinition, current_level: u8) -> ResourceQuantity {
    sum_prefix(&definition.skills.upgrade, current_level)
}

/// Every mastery step of every skill. Operators of 3 stars or fewer have no masteries, whatever
/// the catalog file holds.
pub fn full_mastery_cost(definition: &OperatorDefinition) -> ResourceQuantity {
    if !definition.supports_mastery() {
        return ResourceQuantity::new();
    }
    sum_steps(
        definition
            .skills
            .mastery
            .iter()
            .flat_map(|track| track.upgrade.iter()),
    )
}

/// Mastery recorded for skill slot `skill` (1-based). Slots outside the record read as 0.
pub fn mastery_level_for(levels: &[u8; MASTERY_SLOTS], skill: u8) -> u8 {
    usize::from(skill)
        .checked_sub(1)
        .and_then(|index| levels.get(index))
        .copied()
        .unwrap_or(0)
}

/// Spent mastery resources. Tracks are independent: a skill with no mastery contributes nothing
/// and the walk moves on to the next skill. No rank gate here, so mastery recorded on an operator
/// that cannot have it shows up as negative needed resources.
pub fn spent_mastery_cost(
    definition: &OperatorDefinition,
    levels: &[u8; MASTERY_SLOTS],
) -> ResourceQuantity {
    let mut spent = ResourceQuantity::new();
    for track in &definition.skills.mastery {
        let reached = mastery_level_for(levels, track.skill);
        if reached == 0 {
            continue;
        }
        spent += sum_prefix(&track.upgrade, reached);
    }
    spent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::operator::{MasteryTrack, SkillTree};

    fn cost(pairs: &[(&str, i64)]) -> ResourceQuantity {
        pairs.iter().copied().collect()
    }

    fn step(level: u8, pairs: &[(&str, i64)]) -> UpgradeStep {
        UpgradeStep::new(level, cost(pairs))
    }

    fn mastery(skill: u8, base: i64) -> MasteryTrack {
        MasteryTrack {
            skill,
            upgrade: (1..=3)
                .map(|level| step(level, &[("Skill Summary - 3", base * i64::from(level))]))
                .collect(),
        }
    }

    fn operator(stars: u8) -> OperatorDefinition {
        OperatorDefinition {
            name: "Test".to_string(),
            stars,
            elite: vec![
                step(1, &[("LMD", 30000), ("Sniper Chip", 5)]),
                step(2, &[("LMD", 180000), ("Sniper Dualchip", 4)]),
            ],
            skills: SkillTree {
                upgrade: vec![
                    step(1, &[]),
                    step(2, &[("Skill Summary - 1", 5)]),
                    step(3, &[("Skill Summary - 1", 5), ("Orirock", 6)]),
                ],
                mastery: vec![mastery(1, 1), mastery(2, 10)],
            },
        }
    }

    #[test]
    fn spent_elite_stops_before_higher_stage() {
        let op = operator(6);
        assert_eq!(
            spent_elite_cost(&op, 1),
            cost(&[("LMD", 30000), ("Sniper Chip", 5)])
        );
        assert!(spent_elite_cost(&op, 0).is_empty());
        assert_eq!(spent_elite_cost(&op, 2), full_elite_cost(&op));
    }

    #[test]
    fn elite_stage_cost_picks_one_stage() {
        let op = operator(6);
        assert_eq!(
            elite_stage_cost(&op, 2),
            cost(&[("LMD", 180000), ("Sniper Dualchip", 4)])
        );
        assert!(elite_stage_cost(&op, 3).is_empty());
    }

    #[test]
    fn spent_skill_at_level_zero_or_one_is_empty() {
        let op = operator(6);
        assert!(spent_skill_cost(&op, 0).is_empty());
        assert!(spent_skill_cost(&op, 1).is_zero());
        assert_eq!(spent_skill_cost(&op, 2), cost(&[("Skill Summary - 1", 5)]));
        assert_eq!(spent_skill_cost(&op, 7), full_skill_cost(&op));
    }

    #[test]
    fn mastery_walk_continues_past_unstarted_skill() {
        let op = operator(6);
        let spent = spent_mastery_cost(&op, &[0, 2, 0, 0, 0]);
        assert_eq!(spent, cost(&[("Skill Summary - 3", 10 + 20)]));
    }

    #[test]
    fn mastery_prefix_includes_reached_levels_only() {
        let op = operator(6);
        let spent = spent_mastery_cost(&op, &[2, 0, 0, 0, 0]);
        assert_eq!(spent, cost(&[("Skill Summary - 3", 1 + 2)]));
    }

    #[test]
    fn low_rank_has_no_full_mastery_but_spent_is_not_gated() {
        let op = operator(3);
        assert!(full_mastery_cost(&op).is_empty());
        assert!(!spent_mastery_cost(&op, &[1, 0, 0, 0, 0]).is_empty());
    }

    #[test]
    fn mastery_slots_beyond_record_read_as_zero() {
        let levels = [1, 2, 3, 0, 3];
        assert_eq!(mastery_level_for(&levels, 0), 0);
        assert_eq!(mastery_level_for(&levels, 3), 3);
        assert_eq!(mastery_level_for(&levels, 5), 3);
        assert_eq!(mastery_level_for(&levels, 6), 0);
    }
}
