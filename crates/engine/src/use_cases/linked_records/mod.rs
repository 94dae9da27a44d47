//! Linked record synchronization.
//!
//! A record names its partner in another section through its `link` field,
//! which holds the partner's `repeating_<section>_<rowid>` prefix. Links are
//! plain data: a link to a record that no longer exists is treated as no
//! link at all.

mod abbreviation;
mod action_formula;
mod favorites;
mod mirror;
mod primary_source;
mod spell_attack;

pub use abbreviation::{AbbreviationRule, ABBREVIATION_FIELD, ATTRIBUTE_FIELD};
pub use action_formula::{ActionRollFormulaRule, TOGGLE_ATTACK_FIELD};
pub use favorites::{FavoriteToggleRule, TOGGLE_FAVORITE_FIELD};
pub use mirror::MirrorRule;
pub use primary_source::PrimarySourceRule;
pub use spell_attack::{
    SpellDamageRule, DAMAGE_FIELD, PRIMARY_SOURCE, ROLL_FORMULA_FIELD, SOURCE_FIELD,
    SPELLCASTING_ABILITY,
};

/// Field holding the partner record's prefix.
pub const LINK_FIELD: &str = "link";
