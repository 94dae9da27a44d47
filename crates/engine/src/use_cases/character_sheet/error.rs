//! Character sheet operation errors.

use mythcraft_domain::DomainError;

use crate::dispatch::{DispatchError, RuleError};
use crate::infrastructure::ports::StoreError;

/// Errors a host can see from the sheet facade.
///
/// Failures inside rules never surface here; they are recorded on the
/// operation's `DispatchReport`.
#[derive(Debug, thiserror::Error)]
pub enum CharacterSheetError {
    #[error("Rule registration failed: {0}")]
    Registration(#[from] DispatchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}
