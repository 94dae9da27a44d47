use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier of a record inside a repeating section.
///
/// Generated ids are `-` followed by a v4 UUID in simple form. Ids read back
/// from a store are accepted as-is, as long as they cannot be confused with
/// the `_` separators of the attribute-key layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new() -> Self {
        Self(format!("-{}", Uuid::new_v4().simple()))
    }

    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.is_empty() || raw.contains('_') {
            return Err(DomainError::parse(format!("Invalid row id: {raw:?}")));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RowId {
    fn from(value: Uuid) -> Self {
        Self(format!("-{}", value.simple()))
    }
}
