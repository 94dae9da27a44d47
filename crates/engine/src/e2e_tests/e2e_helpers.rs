//! E2E test helpers for constructing fully wired sheets.

use std::collections::BTreeMap;

use mythcraft_domain::{RowRef, Section};

use crate::infrastructure::ports::AttributeStore;
pub use crate::use_cases::test_support::{standard_sheet, TestSheet, TestSheetExt};

// =============================================================================
// Seeded Characters
// =============================================================================

/// A character last saved before any migration existed.
pub const LEGACY_CHARACTER: [(&str, &str); 9] = [
    ("level", "2"),
    ("awareness", "1"),
    ("initiative_bonus", "2"),
    ("critical_range", "19"),
    ("critical_range_base", "20"),
    ("repeating_attacks_-a1_name", "Longsword"),
    ("repeating_attacks_-a1_bonus", "3"),
    ("repeating_skills_-k1_name", "Stealth"),
    ("repeating_actions_-c1_bonus", "1"),
];

/// A level 3 character with a linked attack and spell.
pub const SPELLCASTER: [(&str, &str); 12] = [
    ("version", "1.3"),
    ("level", "3"),
    ("intellect", "2"),
    ("spellcasting_ability", "@{intellect}"),
    ("primary_source", "arcane"),
    ("repeating_spells_-s1_name", "Firebolt"),
    ("repeating_spells_-s1_source", "Arcane"),
    ("repeating_spells_-s1_description", "A mote of fire."),
    ("repeating_spells_-s2_name", "Smite"),
    ("repeating_spells_-s2_source", "Divine"),
    ("repeating_abilities_-b1_name", "Second Wind"),
    ("repeating_abilities_-b1_description", "Recover stamina."),
];

// =============================================================================
// Inspection
// =============================================================================

/// Records currently in `section`, in creation order.
pub fn rows(sheet: &TestSheet, section: Section) -> Vec<RowRef> {
    sheet
        .store()
        .section_row_ids(&section)
        .expect("in-memory store reads succeed")
        .into_iter()
        .map(|row_id| RowRef::new(section.clone(), row_id))
        .collect()
}

pub fn snapshot(sheet: &TestSheet) -> BTreeMap<String, String> {
    sheet.store().snapshot()
}
