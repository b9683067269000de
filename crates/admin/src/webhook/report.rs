//! Smoke check expectations and results.

use core::fmt;

use super::probe::ProbeOutcome;

/// What a check expects from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    /// Any 2xx status.
    Success,
    /// Exactly this status.
    Status(u16),
}

impl Expectation {
    /// Returns `true` if `outcome` meets this expectation.
    #[must_use]
    pub fn is_met_by(self, outcome: &ProbeOutcome) -> bool {
        match (self, outcome.status()) {
            (_, None) => false,
            (Self::Success, Some(_)) => outcome.is_success(),
            (Self::Status(expected), Some(actual)) => expected == actual,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("2xx"),
            Self::Status(status) => write!(f, "{status}"),
        }
    }
}

/// One executed check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Human-readable check name.
    pub name: String,
    /// `METHOD url`
    pub request: String,
    pub expectation: Expectation,
    pub outcome: ProbeOutcome,
    /// Extra failure reason beyond the status (e.g. unparseable body).
    pub problem: Option<String>,
}

impl CheckResult {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        request: impl Into<String>,
        expectation: Expectation,
        outcome: ProbeOutcome,
    ) -> Self {
        Self {
            name: name.into(),
            request: request.into(),
            expectation,
            outcome,
            problem: None,
        }
    }

    /// Mark the check failed for a reason other than its status.
    #[must_use]
    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    /// Returns `true` if the expectation was met and no problem was recorded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.problem.is_none() && self.expectation.is_met_by(&self.outcome)
    }

    /// The observed result as text (`201`, `no response (Connect)`).
    #[must_use]
    pub fn actual(&self) -> String {
        match &self.outcome {
            ProbeOutcome::Responded { status, .. } => status.to_string(),
            ProbeOutcome::NoResponse { kind, .. } => format!("no response ({kind:?})"),
        }
    }
}

/// Results of a smoke test run.
#[derive(Debug, Clone)]
pub struct SmokeReport {
    /// What was tested (base URL or webhook URL).
    pub target: String,
    pub checks: Vec<CheckResult>,
    /// Checks not run because the target stopped responding.
    pub skipped: usize,
}

impl SmokeReport {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            checks: Vec::new(),
            skipped: 0,
        }
    }

    /// Number of passing checks.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    /// Returns `true` if every check ran and passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.skipped == 0 && !self.checks.is_empty() && self.checks.iter().all(CheckResult::passed)
    }

    /// The first check that got no response, if any.
    #[must_use]
    pub fn unreachable(&self) -> Option<&CheckResult> {
        self.checks
            .iter()
            .find(|c| matches!(c.outcome, ProbeOutcome::NoResponse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::NoResponseKind;

    fn responded(status: u16) -> ProbeOutcome {
        ProbeOutcome::Responded {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_expectation_success() {
        assert!(Expectation::Success.is_met_by(&responded(200)));
        assert!(Expectation::Success.is_met_by(&responded(204)));
        assert!(!Expectation::Success.is_met_by(&responded(400)));
    }

    #[test]
    fn test_expectation_exact_status() {
        assert!(Expectation::Status(400).is_met_by(&responded(400)));
        assert!(!Expectation::Status(400).is_met_by(&responded(422)));
        assert!(!Expectation::Status(400).is_met_by(&ProbeOutcome::NoResponse {
            kind: NoResponseKind::Timeout,
            detail: String::new(),
        }));
    }

    #[test]
    fn test_check_with_problem_fails() {
        let check = CheckResult::new("logs", "GET /logs", Expectation::Success, responded(200));
        assert!(check.passed());
        assert!(!check.with_problem("body is not JSON").passed());
    }

    #[test]
    fn test_report_requires_all_checks() {
        let mut report = SmokeReport::new("http://localhost:3000");
        assert!(!report.passed(), "an empty report is not a pass");

        report.checks.push(CheckResult::new(
            "a",
            "POST /a",
            Expectation::Success,
            responded(200),
        ));
        assert!(report.passed());

        report.skipped = 1;
        assert!(!report.passed());
    }
}
