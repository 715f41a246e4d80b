//! One-call solve entry point.
//!
//! Logging levels:
//! - **DEBUG**: model scale, search completion with status and node count
//! - **TRACE**: incumbent improvements

use tracing::debug;

use raidplan_core::{DamageTable, HealthTable, Result};

use crate::config::SolveParameters;
use crate::engine::BranchAndBound;
use crate::model::BattleModel;
use crate::report::{self, SolveReport};
use crate::termination::TimeTermination;

/// Builds the model from the canonical tables, runs one time-bounded
/// search, and decodes the result.
///
/// Returns `Ok(None)` when the search proves the model infeasible or the
/// budget runs out before any complete assignment is found; both surface
/// to callers as the same no-solution sentinel. Table and parameter
/// problems are errors.
pub fn solve(
    health: &HealthTable,
    damage: &DamageTable,
    params: &SolveParameters,
) -> Result<Option<SolveReport>> {
    let model = BattleModel::build(health, damage, params)?;
    let termination = TimeTermination::from_limit(params.time_limit());
    let outcome = BranchAndBound::new(&model)
        .with_parallel_root_split(params.parallel_root_split)
        .solve(&termination);
    debug!(
        status = %outcome.status,
        score = ?outcome.score,
        nodes = outcome.nodes_explored,
        "solve finished"
    );
    Ok(report::extract(&model, &outcome))
}
