//! Run parameters for a solve invocation.
//!
//! Parameters can be built in code or loaded from TOML:
//!
//! ```
//! use raidplan_solver::SolveParameters;
//!
//! let params = SolveParameters::from_toml_str(r#"
//!     attempts_per_commander = 3
//!     time_limit_seconds = 60.0
//! "#).unwrap();
//!
//! assert_eq!(params.attempts_per_commander, 3);
//! assert!(params.parallel_root_split);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use raidplan_core::{RaidPlanError, Result};

/// Parameter loading error
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parameters for one solve invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SolveParameters {
    /// Total uses per commander; every commander spends exactly this many.
    pub attempts_per_commander: u32,

    /// Wall-clock budget for the search, in seconds.
    pub time_limit_seconds: f64,

    /// Explore the root branches on a rayon pool instead of sequentially.
    #[serde(default = "default_parallel_root_split")]
    pub parallel_root_split: bool,
}

fn default_parallel_root_split() -> bool {
    true
}

impl SolveParameters {
    /// Creates parameters with the default parallel root split.
    pub fn new(attempts_per_commander: u32, time_limit_seconds: f64) -> Self {
        SolveParameters {
            attempts_per_commander,
            time_limit_seconds,
            parallel_root_split: default_parallel_root_split(),
        }
    }

    /// Loads parameters from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> std::result::Result<Self, ParamsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses parameters from a TOML string.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ParamsError> {
        Ok(toml::from_str(s)?)
    }

    /// The time budget as a [`Duration`].
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_seconds)
    }

    /// Checks the parameter ranges: at least one attempt per commander and
    /// at least one second of search time.
    pub fn validate(&self) -> Result<()> {
        if self.attempts_per_commander < 1 {
            return Err(RaidPlanError::Parameters(
                "attempts_per_commander must be at least 1".to_string(),
            ));
        }
        if !self.time_limit_seconds.is_finite() || self.time_limit_seconds < 1.0 {
            return Err(RaidPlanError::Parameters(format!(
                "time_limit_seconds must be at least 1, got {}",
                self.time_limit_seconds
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let params = SolveParameters::new(3, 60.0);
        assert!(params.parallel_root_split);
        assert_eq!(params.time_limit(), Duration::from_secs(60));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let params = SolveParameters::from_toml_str(
            "attempts_per_commander = 5\ntime_limit_seconds = 30.0\nparallel_root_split = false\n",
        )
        .unwrap();
        assert_eq!(params.attempts_per_commander, 5);
        assert!(!params.parallel_root_split);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let params = SolveParameters::new(0, 60.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_sub_second_limit_rejected() {
        let params = SolveParameters::new(1, 0.5);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(matches!(
            SolveParameters::from_toml_str("attempts_per_commander = \"three\""),
            Err(ParamsError::Toml(_))
        ));
    }
}
