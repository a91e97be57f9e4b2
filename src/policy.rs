//! Pass/fail decision against the configured issue threshold

use serde::{Deserialize, Serialize};

/// Threshold policy for one run.
///
/// The policy only returns a decision; it never halts the process. The
/// caller translates a failed verdict into its own failure-propagation
/// mechanism.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// Maximum number of tolerated issues before the run fails
    pub max_issues: usize,
    /// Pass regardless of the count; the true decision is still computed
    pub ignore_failures: bool,
}

impl ThresholdPolicy {
    pub fn new(max_issues: usize, ignore_failures: bool) -> Self {
        Self {
            max_issues,
            ignore_failures,
        }
    }

    /// Compare the aggregated issue count against the threshold
    pub fn evaluate(&self, issue_count: usize) -> Verdict {
        let exceeded = issue_count > self.max_issues;
        Verdict {
            issue_count,
            exceeded,
            passed: self.ignore_failures || !exceeded,
            message: format!("{} issue(s) were found.", issue_count),
        }
    }
}

/// Result of a threshold evaluation.
///
/// `exceeded` reflects the raw threshold comparison even when
/// `ignore_failures` forces `passed`, so callers and tests can observe the
/// true count independently of the suppression flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub issue_count: usize,
    pub exceeded: bool,
    pub passed: bool,
    /// Human-readable summary, e.g. `3 issue(s) were found.`
    pub message: String,
}
