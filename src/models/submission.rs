//! Submission model

use serde::{Deserialize, Serialize};

/// Graded verdict for one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    #[serde(default)]
    pub status: Option<String>,
    pub passed: u32,
    pub total: u32,
    #[serde(default)]
    pub results: Vec<TestOutcome>,
}

impl SubmissionResult {
    /// Check if every hidden test passed
    pub fn is_full_pass(&self) -> bool {
        self.passed == self.total
    }

    /// Check `passed <= total` and one outcome per test
    pub fn is_consistent(&self) -> bool {
        self.passed <= self.total && self.results.len() == self.total as usize
    }

    /// Outcomes of the tests that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &TestOutcome> {
        self.results.iter().filter(|outcome| !outcome.passed)
    }
}

/// Outcome of a single hidden test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    #[serde(default)]
    pub test_id: Option<i64>,
    pub input: String,
    pub expected: String,
    #[serde(default)]
    pub actual: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    pub passed: bool,
}

/// Another user's accepted solution for the same task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSolution {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "solution")]
    pub solution_text: String,
}
