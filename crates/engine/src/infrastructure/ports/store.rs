//! Attribute store port.
//!
//! The host owns the character's data: a flat map of attribute name to
//! string value. Every rule reads and writes through this trait.

use std::collections::{BTreeMap, HashMap};

use mythcraft_domain::{RowId, RowRef, Section};
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// A batch of attribute writes, applied in key order.
pub type AttributeUpdate = BTreeMap<String, String>;

/// How a write is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Silent writes update the store without notifying any rule.
    pub silent: bool,
}

impl WriteOptions {
    pub fn silent() -> Self {
        Self { silent: true }
    }

    pub fn notify() -> Self {
        Self { silent: false }
    }
}

/// One attribute whose value actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub name: String,
    pub previous: String,
    pub new: String,
}

impl AttributeChange {
    pub fn new(name: impl Into<String>, previous: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            previous: previous.into(),
            new: new.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AttributeStore {
    /// Read a batch of attributes. Every requested name is present in the
    /// result; missing attributes read as `""`.
    fn get_attrs(&self, names: &[String]) -> Result<HashMap<String, String>, StoreError>;

    /// Apply a batch of writes and return the entries whose value changed.
    fn set_attrs(
        &mut self,
        update: &AttributeUpdate,
        options: WriteOptions,
    ) -> Result<Vec<AttributeChange>, StoreError>;

    /// Ids of every record in `section`, in creation order.
    fn section_row_ids(&self, section: &Section) -> Result<Vec<RowId>, StoreError>;

    /// Create an empty record with a fresh id.
    fn create_row(&mut self, section: &Section) -> Result<RowRef, StoreError>;

    /// Remove every field of `row` and return the removed values. An
    /// unknown row yields an empty map.
    fn remove_row(&mut self, row: &RowRef) -> Result<HashMap<String, String>, StoreError>;

    /// Full copy of the stored attributes.
    fn snapshot(&self) -> BTreeMap<String, String>;
}
