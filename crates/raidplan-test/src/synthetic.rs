//! Seeded synthetic campaign generation.
//!
//! Damage estimates are sampled uniformly from a band, then attenuated
//! linearly by commander rank and by level, so early commanders and early
//! levels hit hardest. Health values sit well above any single use so
//! clearing a battle takes coordination.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use raidplan_core::{DamageTable, HealthTable};

/// Bosses in battle order.
pub const BOSS_ROSTER: [&str; 5] = ["Ironclad", "Howler", "Forgemaster", "Bulwark", "Nocturne"];

/// Commander call signs; generation cycles with a numeric suffix past the
/// end.
pub const COMMANDER_ROSTER: [&str; 16] = [
    "AshenVanguard",
    "BrineRaider",
    "CinderFalcon",
    "DuskHarbinger",
    "EmberSentinel",
    "FrostLancer",
    "GaleWarden",
    "HollowStriker",
    "IronVesper",
    "JadeMarauder",
    "KiteRunner",
    "LarkspurBlade",
    "MirrorSage",
    "NovaCourier",
    "OnyxHerald",
    "PyreScout",
];

const DAMAGE_FLOOR: u64 = 1_000_000;
const DAMAGE_CEIL: u64 = 500_000_000;
const HEALTH_FLOOR: u64 = 400_000_000;
const HEALTH_CEIL: u64 = 4_000_000_000;

/// Generates a `(health, damage)` table pair for the given roster sizes.
/// The same seed always yields the same tables.
pub fn synthetic_tables(
    seed: u64,
    n_commanders: usize,
    n_levels: usize,
) -> (HealthTable, DamageTable) {
    assert!(n_commanders > 0 && n_levels > 0);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let boss_names: Vec<String> = BOSS_ROSTER.iter().map(|s| s.to_string()).collect();
    let commander_names: Vec<String> = (0..n_commanders).map(commander_name).collect();

    let health_rows = (0..n_levels)
        .map(|level| {
            let healths = (0..boss_names.len())
                .map(|_| {
                    let base = rng.random_range(HEALTH_FLOOR..HEALTH_CEIL);
                    (base as f64 * (1.0 + level as f64 * 0.5)) as u64
                })
                .collect();
            (level as i64 + 1, healths)
        })
        .collect();
    let health =
        HealthTable::from_rows(boss_names.clone(), health_rows).expect("synthetic health table");

    let mut damage_rows = Vec::new();
    for level in 0..n_levels {
        for boss in &boss_names {
            let damages = (0..n_commanders)
                .map(|rank| {
                    let base = rng.random_range(DAMAGE_FLOOR..DAMAGE_CEIL);
                    attenuate(base, rank, n_commanders, level, n_levels)
                })
                .collect();
            damage_rows.push(((boss.clone(), level), damages));
        }
    }
    let damage =
        DamageTable::from_rows(commander_names, damage_rows).expect("synthetic damage table");

    (health, damage)
}

fn commander_name(rank: usize) -> String {
    let base = COMMANDER_ROSTER[rank % COMMANDER_ROSTER.len()];
    if rank < COMMANDER_ROSTER.len() {
        base.to_string()
    } else {
        format!("{}{}", base, rank / COMMANDER_ROSTER.len() + 1)
    }
}

fn attenuate(base: u64, rank: usize, n_ranks: usize, level: usize, n_levels: usize) -> u64 {
    let rank_factor = 1.0 - rank as f64 / n_ranks as f64;
    let level_factor = 1.0 - level as f64 / n_levels as f64;
    (base as f64 * rank_factor * level_factor) as u64
}
