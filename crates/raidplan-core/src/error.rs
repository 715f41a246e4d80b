//! Error types for raidplan

use thiserror::Error;

/// Main error type for raidplan operations
#[derive(Debug, Error)]
pub enum RaidPlanError {
    /// Invalid run parameters (attempts, time limit)
    #[error("Parameter error: {0}")]
    Parameters(String),

    /// Error in the battle domain model (tables, joins)
    #[error("Domain model error: {0}")]
    DomainModel(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for raidplan operations
pub type Result<T> = std::result::Result<T, RaidPlanError>;
