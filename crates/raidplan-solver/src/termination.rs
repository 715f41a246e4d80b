//! Time-based termination for the search.

use std::time::{Duration, Instant};

/// Terminates the search after a wall-clock limit.
///
/// The deadline is fixed when the termination is created, so construct it
/// right before starting the solve.
#[derive(Debug, Clone)]
pub struct TimeTermination {
    deadline: Instant,
}

impl TimeTermination {
    pub fn from_limit(limit: Duration) -> Self {
        Self {
            deadline: Instant::now() + limit,
        }
    }

    pub fn seconds(secs: u64) -> Self {
        Self::from_limit(Duration::from_secs(secs))
    }

    pub fn millis(ms: u64) -> Self {
        Self::from_limit(Duration::from_millis(ms))
    }

    pub fn is_terminated(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_terminated_before_limit() {
        let term = TimeTermination::seconds(3600);
        assert!(!term.is_terminated());
    }

    #[test]
    fn test_terminated_after_limit() {
        let term = TimeTermination::from_limit(Duration::ZERO);
        assert!(term.is_terminated());
    }
}
