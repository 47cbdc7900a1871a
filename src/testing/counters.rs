//! Per-invocation test tally

/// Counts the tests run by one script invocation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunCounters {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    next_id: usize,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a test and return its 1-based id
    pub fn begin(&mut self) -> usize {
        self.next_id += 1;
        self.total += 1;
        self.next_id
    }

    /// Record the outcome of the most recently started test
    pub fn record(&mut self, passed: bool) {
        if passed {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {}, {} passed, {} failed",
            self.total,
            if self.total == 1 { "test" } else { "tests" },
            self.succeeded,
            self.failed
        )
    }
}
