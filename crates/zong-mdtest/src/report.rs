//! Machine-readable run reports.

use serde::Serialize;

/// Outcome of one test case.
#[derive(Clone, Debug, Serialize)]
pub struct TestOutcome {
    /// Source file the test came from; empty when run from a string.
    pub file: String,
    pub name: String,
    pub status: TestStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed { message: String },
}

impl TestOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Aggregated outcomes of a run.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl Report {
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<TestOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        Self {
            total,
            passed,
            failed: total - passed,
            outcomes,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pretty-printed JSON, for tooling that consumes run results.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One line per failure, for assertion messages.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                TestStatus::Passed => None,
                TestStatus::Failed { message } => {
                    Some(format!("{} :: {}: {message}", o.file, o.name))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
