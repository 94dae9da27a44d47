//! Modifier aggregation.
//!
//! A record in the `modifiers` section adds a signed value to one target
//! attribute while its `toggle_active` checkbox is on. The sum of active
//! modifiers lands in `<target>_modifier`, except for initiative which
//! aggregates into `initiative_bonus`.

use serde::{Deserialize, Serialize};

use crate::types::SheetValue;

/// Row fields of a modifier record.
pub const MODIFIER_ATTRIBUTE_FIELD: &str = "attribute";
pub const MODIFIER_VALUE_FIELD: &str = "modifier";
pub const MODIFIER_ACTIVE_FIELD: &str = "toggle_active";
pub const MODIFIER_SOURCE_FIELD: &str = "source";

/// One modifier record as read from the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierEntry {
    pub attribute: String,
    /// Raw stored value, e.g. `"+2"`.
    pub modifier: String,
    pub active: bool,
}

impl ModifierEntry {
    pub fn new(attribute: impl Into<String>, modifier: impl Into<String>, active: bool) -> Self {
        Self {
            attribute: attribute.into(),
            modifier: modifier.into(),
            active,
        }
    }

    /// Build from the stored `toggle_active` text; only `"on"` is active.
    pub fn from_fields(attribute: &str, modifier: &str, toggle_active: &str) -> Self {
        Self::new(attribute.trim(), modifier.trim(), toggle_active == "on")
    }

    /// Whether this entry counts toward its target's total.
    pub fn contributes(&self) -> bool {
        self.active && !self.modifier.is_empty() && self.modifier != "0"
    }

    pub fn value(&self) -> i32 {
        SheetValue::parse(&self.modifier).int_or_zero()
    }
}

/// Attribute the aggregate for `target` is written to.
pub fn modifier_total_attr(target: &str) -> String {
    if target == "initiative" {
        "initiative_bonus".to_string()
    } else {
        format!("{target}_modifier")
    }
}

/// Sum of all contributing entries that target `target`, saturating at the
/// `i32` limits.
pub fn modifier_total(entries: &[ModifierEntry], target: &str) -> i32 {
    entries
        .iter()
        .filter(|entry| entry.attribute == target && entry.contributes())
        .map(ModifierEntry::value)
        .fold(0, i32::saturating_add)
}
