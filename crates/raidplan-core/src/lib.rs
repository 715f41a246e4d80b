//! raidplan Core - Core types for the battle scheduler
//!
//! This crate provides the fundamental types shared by the raidplan crates:
//! - Canonical input tables (boss health, commander damage)
//! - The battle domain model (pre-won vs contested battles, assignments,
//!   outcomes)
//! - The scaled campaign score
//! - The shared error type

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{Assignment, Battle, BattleId, BattleOutcome, DamageTable, HealthTable};
pub use error::{RaidPlanError, Result};
pub use score::CampaignScore;
