//! Dispatch and rule errors.

use mythcraft_domain::DomainError;

use crate::infrastructure::ports::StoreError;

/// Errors raised while registering rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The rule writes (with notification) to something it is triggered by.
    #[error("Rule {rule} would trigger itself through {output}")]
    SelfTriggering { rule: &'static str, output: String },

    #[error("Rule already registered: {0}")]
    DuplicateRule(&'static str),
}

/// Errors a rule can return from `apply`. The dispatcher logs and records
/// them; they never abort the remaining rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// A non-silent write to an attribute matching the rule's own triggers.
    #[error("Rule {rule} attempted a notifying write to its own trigger {attribute}")]
    SelfTrigger {
        rule: &'static str,
        attribute: String,
    },
}

impl RuleError {
    pub fn self_trigger(rule: &'static str, attribute: impl Into<String>) -> Self {
        Self::SelfTrigger {
            rule,
            attribute: attribute.into(),
        }
    }
}
