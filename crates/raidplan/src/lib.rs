//! raidplan - ordered boss-battle scheduling for limited-use commanders.
//!
//! Given per-level boss health, per-commander damage estimates, and a
//! fixed number of uses per commander, raidplan searches for the
//! allocation that clears the most battles in order and pushes the first
//! uncleared battle as far as possible, within a wall-clock budget.
//!
//! # Example
//!
//! ```
//! use raidplan::prelude::*;
//!
//! let health = parse_health_csv("Level,Ironclad\n1,50\n").unwrap();
//! let damage = parse_damage_csv("boss,level,Ash\nIronclad,0,100\n").unwrap();
//! let params = SolveParameters::new(1, 10.0);
//!
//! let report = solve(&health, &damage, &params).unwrap().unwrap();
//! assert_eq!(report.quality, SolutionQuality::Optimal);
//! assert_eq!(report.total_damage, 50);
//! ```

pub use raidplan_core::{
    Assignment, Battle, BattleId, BattleOutcome, CampaignScore, DamageTable, HealthTable,
    RaidPlanError, Result,
};
pub use raidplan_input::{
    load_damage_csv, load_health_csv, parse_damage_csv, parse_health_csv, TableError,
};
pub use raidplan_solver::{
    solve, BattleModel, BranchAndBound, ParamsError, SearchOutcome, SolutionQuality,
    SolveParameters, SolveReport, SolveStatus, TimeTermination,
};

/// Convenience re-exports for typical callers.
pub mod prelude {
    pub use raidplan_core::{Assignment, BattleOutcome, CampaignScore, DamageTable, HealthTable};
    pub use raidplan_input::{
        load_damage_csv, load_health_csv, parse_damage_csv, parse_health_csv,
    };
    pub use raidplan_solver::{solve, SolutionQuality, SolveParameters, SolveReport};
}
