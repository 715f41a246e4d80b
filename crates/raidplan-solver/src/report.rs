//! Result extraction: decodes a finished search into assignment records,
//! aggregate totals, and the battle log.

use std::fmt::Write as _;

use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use raidplan_core::{Assignment, Battle, BattleOutcome, CampaignScore};

use crate::engine::{SearchOutcome, SolveStatus};
use crate::model::BattleModel;

const SEPARATOR: &str = "------------------------";

/// Whether the returned assignment is proven best or merely the best
/// found within the time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolutionQuality {
    Optimal,
    Feasible,
}

impl std::fmt::Display for SolutionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolutionQuality::Optimal => write!(f, "Optimal"),
            SolutionQuality::Feasible => write!(f, "Feasible"),
        }
    }
}

/// Decoded solve result.
///
/// `total_damage` is health-clipped: overkill beyond a battle's health is
/// excluded, partial damage on the uncleared battle counts as-is.
/// `potential_damage` is the raw unclipped sum over all assignments, and
/// `damage_efficiency` their ratio as a percentage. `bosses_defeated`
/// carries the frontier fraction (e.g. 3.45) and excludes pre-won battles.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    pub quality: SolutionQuality,
    pub assignments: Vec<Assignment>,
    pub outcomes: Vec<BattleOutcome>,
    pub boss_names: Vec<String>,
    pub bosses_defeated: f64,
    pub total_damage: u64,
    pub potential_damage: u64,
    pub damage_efficiency: f64,
    pub battle_log: String,
}

/// Decodes the engine's terminal state, or returns `None` when it ended
/// without a solution.
pub(crate) fn extract(model: &BattleModel, outcome: &SearchOutcome) -> Option<SolveReport> {
    let quality = match outcome.status {
        SolveStatus::Optimal => SolutionQuality::Optimal,
        SolveStatus::Feasible => SolutionQuality::Feasible,
        SolveStatus::Infeasible | SolveStatus::NoSolutionFound => return None,
    };
    let incumbent = outcome.best.as_ref()?;

    let boss_names = model.boss_names();
    let commander_names = model.commander_names();
    let contested = model.contested();

    let mut assignments = Vec::new();
    let mut outcomes = Vec::with_capacity(model.battles().len());
    let mut log = String::new();
    let mut total_damage = 0u64;
    let mut potential_damage = 0u64;
    let mut contested_idx = 0usize;
    let mut defeats = 0i64;
    let mut frontier_progress: Option<i64> = None;

    for level in 0..model.level_count() {
        let display_level = model.level_offset() + level as i64;
        writeln!(log, "{}", SEPARATOR).unwrap();
        writeln!(log, "Level {} :", display_level).unwrap();
        writeln!(log, "{}", SEPARATOR).unwrap();

        for boss in 0..boss_names.len() {
            writeln!(log, "{}", SEPARATOR).unwrap();
            let battle = &model.battles()[level * boss_names.len() + boss];
            match battle {
                Battle::PreWon(_) => {
                    writeln!(log, "{} was already defeated", boss_names[boss]).unwrap();
                    outcomes.push(BattleOutcome {
                        boss: boss_names[boss].clone(),
                        level: display_level,
                        health: 0,
                        damage: 0,
                        defeated: true,
                        pre_won: true,
                        overkill: 0,
                        leftover: 0,
                    });
                }
                Battle::Contested(id, health) => {
                    let health = *health;
                    let k = contested_idx;
                    contested_idx += 1;
                    debug_assert_eq!(contested[k].id, *id);
                    writeln!(
                        log,
                        "{} with {} health :",
                        boss_names[boss],
                        health.to_formatted_string(&Locale::en)
                    )
                    .unwrap();

                    let mut battle_damage = 0u64;
                    for (commander, name) in commander_names.iter().enumerate() {
                        let uses = incumbent.uses[commander][k];
                        if uses == 0 {
                            continue;
                        }
                        let damage_per_use = contested[k].damage[commander];
                        let damage = damage_per_use * uses as u64;
                        battle_damage += damage;
                        potential_damage += damage;
                        assignments.push(Assignment {
                            commander: name.clone(),
                            boss: boss_names[boss].clone(),
                            level: display_level,
                            damage_per_use,
                            uses,
                            damage,
                        });
                        writeln!(
                            log,
                            "Commander {} with {} damage, {} times",
                            name,
                            damage_per_use.to_formatted_string(&Locale::en),
                            uses
                        )
                        .unwrap();
                    }

                    let defeated = battle_damage >= health;
                    if defeated {
                        defeats += 1;
                    } else if frontier_progress.is_none() {
                        frontier_progress = Some(
                            (CampaignScore::SCALE as u128 * battle_damage as u128
                                / health as u128) as i64,
                        );
                    }
                    if battle_damage > health {
                        total_damage += health;
                        writeln!(
                            log,
                            "Overkill damage : {}",
                            (battle_damage - health).to_formatted_string(&Locale::en)
                        )
                        .unwrap();
                    } else if battle_damage == health {
                        total_damage += health;
                    } else if battle_damage > 0 {
                        total_damage += battle_damage;
                        writeln!(
                            log,
                            "Leftover health : {}",
                            (health - battle_damage).to_formatted_string(&Locale::en)
                        )
                        .unwrap();
                    }

                    outcomes.push(BattleOutcome {
                        boss: boss_names[boss].clone(),
                        level: display_level,
                        health,
                        damage: battle_damage,
                        defeated,
                        pre_won: false,
                        overkill: battle_damage.saturating_sub(health),
                        leftover: health.saturating_sub(battle_damage),
                    });
                }
            }
        }
    }

    debug_assert_eq!(
        CampaignScore::from_parts(defeats, frontier_progress.unwrap_or(0)),
        incumbent.score,
        "decoded outcomes disagree with the search objective"
    );

    let damage_efficiency = if potential_damage == 0 {
        100.0
    } else {
        total_damage as f64 / potential_damage as f64 * 100.0
    };

    Some(SolveReport {
        quality,
        assignments,
        outcomes,
        boss_names: boss_names.to_vec(),
        bosses_defeated: incumbent.score.as_fractional_defeats(),
        total_damage,
        potential_damage,
        damage_efficiency,
        battle_log: log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolveParameters;
    use crate::engine::BranchAndBound;
    use crate::termination::TimeTermination;
    use raidplan_core::{DamageTable, HealthTable};

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn solve_model(model: &BattleModel) -> SolveReport {
        let outcome = BranchAndBound::new(model)
            .with_parallel_root_split(false)
            .solve(&TimeTermination::seconds(10));
        extract(model, &outcome).expect("model should be solvable")
    }

    #[test]
    fn test_exact_kill_counts_health_without_annotation() {
        let health = HealthTable::from_rows(names(&["A"]), vec![(1, vec![100])]).unwrap();
        let damage =
            DamageTable::from_rows(names(&["X"]), vec![(("A".to_string(), 0), vec![100])])
                .unwrap();
        let model =
            BattleModel::build(&health, &damage, &SolveParameters::new(1, 10.0)).unwrap();
        let report = solve_model(&model);
        assert_eq!(report.total_damage, 100);
        assert_eq!(report.potential_damage, 100);
        assert!(!report.battle_log.contains("Overkill"));
        assert!(!report.battle_log.contains("Leftover"));
    }

    #[test]
    fn test_pre_won_battle_logged() {
        let health =
            HealthTable::from_rows(names(&["A", "B"]), vec![(1, vec![0, 60])]).unwrap();
        let damage =
            DamageTable::from_rows(names(&["X"]), vec![(("B".to_string(), 0), vec![60])])
                .unwrap();
        let model =
            BattleModel::build(&health, &damage, &SolveParameters::new(1, 10.0)).unwrap();
        let report = solve_model(&model);
        assert!(report.battle_log.contains("A was already defeated"));
        assert!(report.outcomes[0].pre_won);
        assert!(report.outcomes[0].defeated);
        // The pre-won battle is excluded from the tally.
        assert!((report.bosses_defeated - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_thousands_separators_in_log() {
        let health =
            HealthTable::from_rows(names(&["A"]), vec![(1, vec![1_500_000])]).unwrap();
        let damage = DamageTable::from_rows(
            names(&["X"]),
            vec![(("A".to_string(), 0), vec![2_000_000])],
        )
        .unwrap();
        let model =
            BattleModel::build(&health, &damage, &SolveParameters::new(1, 10.0)).unwrap();
        let report = solve_model(&model);
        assert!(report.battle_log.contains("A with 1,500,000 health :"));
        assert!(report.battle_log.contains("Commander X with 2,000,000 damage, 1 times"));
        assert!(report.battle_log.contains("Overkill damage : 500,000"));
    }
}
