//! Validation error types.

use thiserror::Error;

/// A single violated rule, located by its JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Dotted JSON path of the offending field, e.g. `orderLineItems[0].quantity`.
    /// Empty for the payload root.
    pub path: String,

    /// What was wrong with the field.
    pub message: String,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A payload failed its contract. Lists every violated field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{contract} failed validation: {}", render(.issues))]
pub struct ValidationError {
    /// Name of the contract that rejected the payload.
    pub contract: &'static str,

    /// Every violation found.
    pub issues: Vec<Issue>,
}

impl ValidationError {
    /// Creates a validation error from collected issues.
    pub fn new(contract: &'static str, issues: Vec<Issue>) -> Self {
        Self { contract, issues }
    }

    /// Creates a validation error with a single issue.
    pub fn single(
        contract: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(contract, vec![Issue::new(path, message)])
    }

    /// Returns true if any issue was reported at exactly this path.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn render(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
