//! Check results and the report that aggregates them.

use std::fmt;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Something looks off but the artifact is usable.
    Warning,
    /// The artifact does not conform.
    Failure,
}

impl Severity {
    /// Four-letter tag used in printed reports.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// One check result.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Validator that produced the result, such as `artifact/turtle`.
    pub validator: String,
    /// What was checked and how it went.
    pub message: String,
    /// Outcome.
    pub severity: Severity,
    /// Extra lines, such as offending values.
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// A passing check.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass)
    }

    /// A failed check.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure)
    }

    /// A failed check with detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::fail(validator, message)
        }
    }

    /// A warning.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Warning)
    }

    /// Whether the check failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Every check result of a conformance run, in execution order.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// The results.
    pub results: Vec<CheckResult>,
}

impl ConformanceReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Appends the results of another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Number of results with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Whether no check failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(
                f,
                "[{}] {}: {}",
                result.severity.tag(),
                result.validator,
                result.message
            )?;
            for detail in &result.details {
                writeln!(f, "       {detail}")?;
            }
        }
        write!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.count(Severity::Pass),
            self.count(Severity::Warning),
            self.count(Severity::Failure)
        )
    }
}
