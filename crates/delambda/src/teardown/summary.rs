//! Batch outcome tally

use crate::error::TeardownError;

/// Outcome of a batch teardown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// `(function name, error message)` in processing order
    pub failures: Vec<(String, String)>,
}

impl TeardownSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, name: &str, error: &TeardownError) {
        self.failed += 1;
        self.failures.push((name.to_string(), error.full_message()));
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// `Ok(self)` if nothing failed, otherwise [`TeardownError::PartialFailure`]
    pub fn into_result(self) -> Result<Self, TeardownError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TeardownError::PartialFailure {
                failed: self.failed,
                total: self.total,
            })
        }
    }
}
