//! Canonical input tables.
//!
//! Both tables arrive unit-resolved: every cell is a non-negative integer.
//! The constructors enforce the normalization invariants (level ordering,
//! all-zero-row dropping, rectangular shape) so the rest of the system can
//! rely on them.

use std::collections::HashMap;

use crate::error::{RaidPlanError, Result};

/// Per-level boss health, with bosses in battle order.
///
/// Rows are sorted ascending by level and rows where every boss has zero
/// health are dropped on construction. The level offset remembers the
/// display number of the first kept row so output can match the input's
/// numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTable {
    level_offset: i64,
    boss_names: Vec<String>,
    rows: Vec<Vec<u64>>,
}

impl HealthTable {
    /// Builds a health table from `(level, healths)` rows.
    ///
    /// Rows may arrive in any order; they are sorted by level. Rows where
    /// every boss has zero health are dropped.
    pub fn from_rows(boss_names: Vec<String>, rows: Vec<(i64, Vec<u64>)>) -> Result<Self> {
        if boss_names.is_empty() {
            return Err(RaidPlanError::DomainModel(
                "health table has no boss columns".to_string(),
            ));
        }
        let mut rows = rows;
        rows.sort_by_key(|(level, _)| *level);
        rows.retain(|(_, healths)| healths.iter().any(|&h| h != 0));
        if rows.is_empty() {
            return Err(RaidPlanError::DomainModel(
                "health table has no level rows with nonzero health".to_string(),
            ));
        }
        for (level, healths) in &rows {
            if healths.len() != boss_names.len() {
                return Err(RaidPlanError::DomainModel(format!(
                    "health row for level {} has {} cells, expected {}",
                    level,
                    healths.len(),
                    boss_names.len()
                )));
            }
        }
        let level_offset = rows[0].0;
        Ok(HealthTable {
            level_offset,
            boss_names,
            rows: rows.into_iter().map(|(_, healths)| healths).collect(),
        })
    }

    /// Boss names in battle order (the column order of the input).
    pub fn boss_names(&self) -> &[String] {
        &self.boss_names
    }

    /// Display number of the first kept level.
    pub fn level_offset(&self) -> i64 {
        self.level_offset
    }

    /// Number of kept level rows.
    pub fn level_count(&self) -> usize {
        self.rows.len()
    }

    /// Health of `boss` at the 0-based `level` row.
    pub fn health(&self, level: usize, boss: usize) -> u64 {
        self.rows[level][boss]
    }

    /// Largest health value in the table.
    pub fn max_health(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Per-use damage estimates, indexed by (boss name, level row) pairs with
/// commanders as columns.
///
/// Level indices are 0-based row positions aligned with the kept rows of
/// the [`HealthTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageTable {
    commander_names: Vec<String>,
    rows: HashMap<(String, usize), Vec<u64>>,
}

impl DamageTable {
    /// Builds a damage table from `((boss, level), damages)` rows.
    pub fn from_rows(
        commander_names: Vec<String>,
        rows: Vec<((String, usize), Vec<u64>)>,
    ) -> Result<Self> {
        let mut map = HashMap::with_capacity(rows.len());
        for ((boss, level), damages) in rows {
            if damages.len() != commander_names.len() {
                return Err(RaidPlanError::DomainModel(format!(
                    "damage row for ({}, {}) has {} cells, expected {}",
                    boss,
                    level,
                    damages.len(),
                    commander_names.len()
                )));
            }
            if map.insert((boss.clone(), level), damages).is_some() {
                return Err(RaidPlanError::DomainModel(format!(
                    "duplicate damage row for ({}, {})",
                    boss, level
                )));
            }
        }
        Ok(DamageTable {
            commander_names,
            rows: map,
        })
    }

    /// Commander names in column order.
    pub fn commander_names(&self) -> &[String] {
        &self.commander_names
    }

    /// Per-commander damage of `boss` at `level`, if present.
    pub fn damage_row(&self, boss: &str, level: usize) -> Option<&[u64]> {
        self.rows
            .get(&(boss.to_string(), level))
            .map(Vec::as_slice)
    }
}
