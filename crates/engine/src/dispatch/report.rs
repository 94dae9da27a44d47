//! What happened during one sheet operation.

use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::AttributeChange;

/// A validation message produced by a rule. Never blocks the edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: String,
    pub message: String,
}

/// A rule or write that failed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    /// Rule name, or `"sheet"` for writes made outside any rule.
    pub rule: String,
    /// The attribute or record being processed.
    pub subject: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Every write that changed a value, silent or not, in order.
    pub changes: Vec<AttributeChange>,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn record_changes(&mut self, changes: &[AttributeChange]) {
        self.changes.extend_from_slice(changes);
    }

    /// Record a diagnostic, skipping exact repeats from re-runs of a rule.
    pub fn record_diagnostic(&mut self, rule: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            rule: rule.to_string(),
            message: message.into(),
        };
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    pub fn record_failure(&mut self, rule: &str, subject: impl Into<String>, error: impl ToString) {
        self.failures.push(DispatchFailure {
            rule: rule.to_string(),
            subject: subject.into(),
            error: error.to_string(),
        });
    }

    /// Every change recorded for `name`.
    pub fn changes_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AttributeChange> + 'a {
        self.changes.iter().filter(move |change| change.name == name)
    }

    /// The final value written to `name` during the operation.
    pub fn last_value(&self, name: &str) -> Option<&str> {
        self.changes
            .iter()
            .filter(|change| change.name == name)
            .last()
            .map(|change| change.new.as_str())
    }

    pub fn merge(&mut self, other: DispatchReport) {
        self.changes.extend(other.changes);
        for diagnostic in other.diagnostics {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
        self.failures.extend(other.failures);
    }
}
