//! Hand-built campaign fixtures.

use raidplan_core::{DamageTable, HealthTable};

/// One boss ("Ironclad"), one level, one commander ("Ash").
pub fn single_battle(health: u64, damage_per_use: u64) -> (HealthTable, DamageTable) {
    one_level(&[("Ironclad", health)], &[("Ash", &[damage_per_use])])
}

/// A single-level campaign. `bosses` pairs names with health in battle
/// order; each commander brings its per-boss damage in the same order.
pub fn one_level(
    bosses: &[(&str, u64)],
    commanders: &[(&str, &[u64])],
) -> (HealthTable, DamageTable) {
    let boss_names: Vec<String> = bosses.iter().map(|(name, _)| name.to_string()).collect();
    let healths: Vec<u64> = bosses.iter().map(|(_, health)| *health).collect();
    let health = HealthTable::from_rows(boss_names.clone(), vec![(1, healths)])
        .expect("fixture health table");

    let commander_names: Vec<String> =
        commanders.iter().map(|(name, _)| name.to_string()).collect();
    let rows = boss_names
        .iter()
        .enumerate()
        .map(|(b, boss)| {
            let damages = commanders.iter().map(|(_, row)| row[b]).collect();
            ((boss.clone(), 0), damages)
        })
        .collect();
    let damage =
        DamageTable::from_rows(commander_names, rows).expect("fixture damage table");

    (health, damage)
}
