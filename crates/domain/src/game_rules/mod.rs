//! Derivation formulas for the Mythcraft character sheet.
//!
//! Everything here is pure: values in, values out. The engine's rules read
//! the store, call into these functions and write the results back.

pub mod abbreviation;
pub mod action_points;
pub mod attribute_points;
pub mod critical;
pub mod defenses;
pub mod luck;
pub mod modifiers;
pub mod roll_formula;

pub use abbreviation::{attribute_abbreviation, attribute_abbreviation_display, strip_reference};
pub use action_points::{action_points, action_points_with, ActionPointStats, BASE_ACTION_POINTS};
pub use attribute_points::{
    attribute_cap, compute_attribute_point_usage, validate_attributes, value_check,
    value_check_stored, AttributePointUsage, AttributeScores, AttributeValidation,
};
pub use critical::{
    critical_fail_range, critical_hit_enabled, critical_hit_range, format_critical_fail, CriticalHit,
    DEFAULT_CRITICAL_FAIL_BASE, DEFAULT_CRITICAL_HIT_BASE,
};
pub use defenses::{defense_inputs, defense_total, initiative_total};
pub use luck::{luck_stats, LuckStats};
pub use modifiers::{modifier_total, modifier_total_attr, ModifierEntry};
pub use roll_formula::{action_roll_formula, spell_card_formula, spell_roll_formula, ActionFormulaOptions};
