//! Structural properties every returned solution must satisfy.

use std::collections::HashMap;

use raidplan_solver::{solve, SolveParameters, SolveReport};
use raidplan_test::synthetic_tables;

const ATTEMPTS: u32 = 2;

fn solve_synthetic(seed: u64, time_limit: f64) -> SolveReport {
    let (health, damage) = synthetic_tables(seed, 4, 2);
    let mut params = SolveParameters::new(ATTEMPTS, time_limit);
    params.parallel_root_split = false;
    solve(&health, &damage, &params)
        .unwrap()
        .expect("synthetic campaigns are always solvable")
}

#[test]
fn budget_is_fully_spent_by_every_commander() {
    for seed in 1..=5 {
        let report = solve_synthetic(seed, 5.0);
        let mut spent: HashMap<&str, u32> = HashMap::new();
        for assignment in &report.assignments {
            *spent.entry(assignment.commander.as_str()).or_default() += assignment.uses;
        }
        assert_eq!(spent.len(), 4, "seed {}: every commander must appear", seed);
        for (commander, uses) in spent {
            assert_eq!(
                uses, ATTEMPTS,
                "seed {}: commander {} spent {} of {}",
                seed, commander, uses, ATTEMPTS
            );
        }
    }
}

#[test]
fn damage_only_lands_behind_defeated_battles() {
    for seed in 1..=5 {
        let report = solve_synthetic(seed, 5.0);
        let mut unlocked = true;
        for outcome in &report.outcomes {
            if outcome.damage > 0 {
                assert!(
                    unlocked,
                    "seed {}: {} at level {} was hit while locked",
                    seed, outcome.boss, outcome.level
                );
            }
            unlocked &= outcome.defeated;
        }
    }
}

#[test]
fn at_most_one_battle_is_partially_damaged() {
    for seed in 1..=5 {
        let report = solve_synthetic(seed, 5.0);
        let partial = report
            .outcomes
            .iter()
            .filter(|o| o.damage > 0 && o.damage < o.health)
            .count();
        assert!(partial <= 1, "seed {}: {} partial battles", seed, partial);
    }
}

#[test]
fn efficiency_stays_within_percentage_bounds() {
    for seed in 1..=5 {
        let report = solve_synthetic(seed, 5.0);
        assert!(
            (0.0..=100.0).contains(&report.damage_efficiency),
            "seed {}: efficiency {}",
            seed,
            report.damage_efficiency
        );
        assert!(report.total_damage <= report.potential_damage);
    }
}

#[test]
fn more_time_never_worsens_the_objective() {
    for seed in 1..=3 {
        let quick = solve_synthetic(seed, 1.0);
        let patient = solve_synthetic(seed, 3.0);
        assert!(
            patient.bosses_defeated >= quick.bosses_defeated,
            "seed {}: {} regressed to {}",
            seed,
            quick.bosses_defeated,
            patient.bosses_defeated
        );
    }
}

#[test]
fn outcomes_cover_every_battle_in_order() {
    let report = solve_synthetic(1, 5.0);
    // 5 bosses x 2 levels
    assert_eq!(report.outcomes.len(), 10);
    let mut last_level = i64::MIN;
    for outcome in &report.outcomes {
        assert!(outcome.level >= last_level);
        last_level = outcome.level;
    }
}
