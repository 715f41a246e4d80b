//! Model builder: turns the canonical tables and run parameters into the
//! search model.
//!
//! The model fixes the total battle order (boss-major within a level,
//! levels ascending), classifies every battle as pre-won or contested, and
//! precomputes the per-battle search tables: commanders in descending
//! damage order, the best single-use damage, and the pooled-relaxation use
//! cost that backs the optimistic bound. All bounds derive from the input
//! of the current run.

use smallvec::SmallVec;

use raidplan_core::{Battle, BattleId, DamageTable, HealthTable, RaidPlanError, Result};

use crate::config::SolveParameters;

/// One contested battle with its precomputed search tables.
#[derive(Debug, Clone)]
pub(crate) struct ContestedBattle {
    pub(crate) id: BattleId,
    pub(crate) health: u64,
    /// Damage per use, indexed by commander.
    pub(crate) damage: Vec<u64>,
    /// Commanders with nonzero damage here, best first.
    pub(crate) order: SmallVec<[usize; 16]>,
    /// Best single-use damage any commander deals here.
    pub(crate) max_damage: u64,
    /// Fewest uses that could defeat this battle if every use dealt
    /// `max_damage`; `u64::MAX` when no commander damages it at all.
    pub(crate) relaxed_need: u64,
}

/// The complete search model for one solve invocation.
#[derive(Debug, Clone)]
pub struct BattleModel {
    boss_names: Vec<String>,
    commander_names: Vec<String>,
    level_offset: i64,
    level_count: usize,
    attempts_per_commander: u32,
    battles: Vec<Battle>,
    contested: Vec<ContestedBattle>,
    pre_won_count: usize,
    max_health: u64,
}

impl BattleModel {
    /// Builds the model, validating the parameters and the join between
    /// the two tables.
    pub fn build(
        health: &HealthTable,
        damage: &DamageTable,
        params: &SolveParameters,
    ) -> Result<Self> {
        params.validate()?;

        let boss_names = health.boss_names().to_vec();
        let commander_names = damage.commander_names().to_vec();
        let level_count = health.level_count();

        let mut battles = Vec::with_capacity(level_count * boss_names.len());
        let mut contested = Vec::new();
        let mut pre_won_count = 0;

        for level in 0..level_count {
            for boss in 0..boss_names.len() {
                let id = BattleId::new(boss, level);
                let hp = health.health(level, boss);
                if hp == 0 {
                    battles.push(Battle::PreWon(id));
                    pre_won_count += 1;
                    continue;
                }
                let row = damage.damage_row(&boss_names[boss], level).ok_or_else(|| {
                    RaidPlanError::DomainModel(format!(
                        "no damage row for boss {} at level row {}",
                        boss_names[boss], level
                    ))
                })?;
                contested.push(ContestedBattle::new(id, hp, row));
                battles.push(Battle::Contested(id, hp));
            }
        }

        tracing::debug!(
            battles = battles.len(),
            contested = contested.len(),
            pre_won = pre_won_count,
            commanders = commander_names.len(),
            attempts = params.attempts_per_commander,
            "battle model built"
        );

        Ok(BattleModel {
            boss_names,
            commander_names,
            level_offset: health.level_offset(),
            level_count,
            attempts_per_commander: params.attempts_per_commander,
            battles,
            contested,
            pre_won_count,
            max_health: health.max_health(),
        })
    }

    pub fn boss_names(&self) -> &[String] {
        &self.boss_names
    }

    pub fn commander_names(&self) -> &[String] {
        &self.commander_names
    }

    pub fn level_offset(&self) -> i64 {
        self.level_offset
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    pub fn attempts_per_commander(&self) -> u32 {
        self.attempts_per_commander
    }

    /// All battles in the total order.
    pub fn battles(&self) -> &[Battle] {
        &self.battles
    }

    pub fn pre_won_count(&self) -> usize {
        self.pre_won_count
    }

    /// Largest health value in the campaign; the damage domain of any
    /// swapped-in bounded solver must cover twice this to tolerate
    /// overkill.
    pub fn max_health(&self) -> u64 {
        self.max_health
    }

    /// Total uses the roster must spend.
    pub fn total_uses(&self) -> u64 {
        self.commander_names.len() as u64 * self.attempts_per_commander as u64
    }

    pub(crate) fn contested(&self) -> &[ContestedBattle] {
        &self.contested
    }
}

impl ContestedBattle {
    fn new(id: BattleId, health: u64, damage_row: &[u64]) -> Self {
        let damage = damage_row.to_vec();
        let mut order: SmallVec<[usize; 16]> =
            (0..damage.len()).filter(|&c| damage[c] > 0).collect();
        order.sort_by(|&a, &b| damage[b].cmp(&damage[a]));
        let max_damage = order.first().map_or(0, |&c| damage[c]);
        let relaxed_need = if max_damage == 0 {
            u64::MAX
        } else {
            health.div_ceil(max_damage)
        };
        ContestedBattle {
            id,
            health,
            damage,
            order,
            max_damage,
            relaxed_need,
        }
    }
}
