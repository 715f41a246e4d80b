//! Data normalization for raidplan.
//!
//! Turns the two raw CSV tables into the canonical [`HealthTable`] and
//! [`DamageTable`]. Health cells accept plain integers or decimal
//! magnitudes with a `K`/`M`/`B` suffix (thousand/million/billion,
//! case-insensitive). Cells that cannot be parsed resolve to zero with a
//! logged warning; the solve then treats a fully zeroed battle as already
//! won instead of failing.
//!
//! # Examples
//!
//! ```
//! use raidplan_input::parse_health_csv;
//!
//! let table = parse_health_csv("Level,Ironclad,Howler\n37,1.5M,800K\n38,2B,1M\n").unwrap();
//! assert_eq!(table.level_offset(), 37);
//! assert_eq!(table.health(0, 0), 1_500_000);
//! assert_eq!(table.health(1, 0), 2_000_000_000);
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::warn;

use raidplan_core::{DamageTable, HealthTable, RaidPlanError};

/// Table normalization error
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] RaidPlanError),
}

/// Parses the boss-health CSV: `Level,<boss>,<boss>,...` with one row per
/// level. Rows may arrive unsorted; all-zero rows are dropped downstream.
pub fn parse_health_csv(contents: &str) -> Result<HealthTable, TableError> {
    let mut lines = csv_lines(contents);
    let header = lines
        .next()
        .ok_or_else(|| TableError::Invalid("health table is empty".to_string()))?;
    let columns = split_row(header);
    if columns.len() < 2 {
        return Err(TableError::Invalid(
            "health table needs a level column and at least one boss column".to_string(),
        ));
    }
    let boss_names: Vec<String> = columns[1..].iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for line in lines {
        let cells = split_row(line);
        if cells.len() != columns.len() {
            return Err(TableError::Invalid(format!(
                "health row '{}' has {} cells, expected {}",
                line,
                cells.len(),
                columns.len()
            )));
        }
        let level: i64 = cells[0].parse().map_err(|_| {
            TableError::Invalid(format!("health row has non-integer level '{}'", cells[0]))
        })?;
        let healths = cells[1..]
            .iter()
            .enumerate()
            .map(|(boss, cell)| {
                parse_magnitude(cell).unwrap_or_else(|| {
                    warn!(
                        boss = boss_names[boss].as_str(),
                        level,
                        cell = %cell,
                        "could not parse health cell, substituting zero"
                    );
                    0
                })
            })
            .collect();
        rows.push((level, healths));
    }

    Ok(HealthTable::from_rows(boss_names, rows)?)
}

/// Parses the commander-damage CSV: `boss,level,<commander>,...` with one
/// row per (boss, level) pair. Level values are 0-based row positions
/// aligned with the kept health rows.
pub fn parse_damage_csv(contents: &str) -> Result<DamageTable, TableError> {
    let mut lines = csv_lines(contents);
    let header = lines
        .next()
        .ok_or_else(|| TableError::Invalid("damage table is empty".to_string()))?;
    let columns = split_row(header);
    if columns.len() < 3 {
        return Err(TableError::Invalid(
            "damage table needs boss and level columns and at least one commander column"
                .to_string(),
        ));
    }
    let commander_names: Vec<String> = columns[2..].iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for line in lines {
        let cells = split_row(line);
        if cells.len() != columns.len() {
            return Err(TableError::Invalid(format!(
                "damage row '{}' has {} cells, expected {}",
                line,
                cells.len(),
                columns.len()
            )));
        }
        let boss = cells[0].to_string();
        let level: usize = cells[1].parse().map_err(|_| {
            TableError::Invalid(format!("damage row has non-integer level '{}'", cells[1]))
        })?;
        let damages = cells[2..]
            .iter()
            .enumerate()
            .map(|(commander, cell)| {
                parse_integer(cell).unwrap_or_else(|| {
                    warn!(
                        commander = commander_names[commander].as_str(),
                        boss = boss.as_str(),
                        level,
                        cell = %cell,
                        "could not parse damage cell, substituting zero"
                    );
                    0
                })
            })
            .collect();
        rows.push(((boss, level), damages));
    }

    Ok(DamageTable::from_rows(commander_names, rows)?)
}

/// Loads and parses the boss-health CSV from a file.
pub fn load_health_csv(path: impl AsRef<Path>) -> Result<HealthTable, TableError> {
    let contents = std::fs::read_to_string(path)?;
    parse_health_csv(&contents)
}

/// Loads and parses the commander-damage CSV from a file.
pub fn load_damage_csv(path: impl AsRef<Path>) -> Result<DamageTable, TableError> {
    let contents = std::fs::read_to_string(path)?;
    parse_damage_csv(&contents)
}

fn csv_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

fn split_row(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Parses a health magnitude: a plain non-negative integer or a decimal
/// with a K/M/B suffix. Returns `None` for anything else.
fn parse_magnitude(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(value) = cell.parse::<u64>() {
        return Some(value);
    }
    let multiplier = match cell.chars().last()?.to_ascii_uppercase() {
        'K' => 1_000u64,
        'M' => 1_000_000,
        'B' => 1_000_000_000,
        _ => return None,
    };
    let number: f64 = cell[..cell.len() - 1].trim().parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some((number * multiplier as f64) as u64)
}

/// Parses a damage estimate: a plain non-negative integer, tolerating a
/// trailing decimal part from spreadsheet exports.
fn parse_integer(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(value) = cell.parse::<u64>() {
        return Some(value);
    }
    let number: f64 = cell.parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some(number as u64)
}

#[cfg(test)]
mod tests;
