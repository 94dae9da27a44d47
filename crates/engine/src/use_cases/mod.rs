//! Use cases - sheet behaviour built on the dispatcher.
//!
//! - `derivations` - derived values recomputed from their inputs
//! - `linked_records` - keeps linked records across sections in step
//! - `migrations` - ordered version upgrades run when a sheet is opened
//! - `character_sheet` - the facade hosts drive

use std::sync::Arc;

pub mod character_sheet;
pub mod derivations;
pub mod linked_records;
pub mod migrations;

#[cfg(test)]
pub(crate) mod test_support;

pub use character_sheet::{CharacterSheet, CharacterSheetError, RowOutcome};
pub use migrations::{MigrationChain, MigrationOutcome, MigrationStep, SheetVersion};

use crate::dispatch::SheetRule;

/// Every built-in rule, in registration order.
///
/// Derivations come first so totals are settled before linked records copy
/// them around.
pub fn standard_rules() -> Vec<Arc<dyn SheetRule>> {
    vec![
        Arc::new(derivations::AttributeBudgetRule),
        Arc::new(derivations::LuckRule),
        Arc::new(derivations::ActionPointsRule),
        Arc::new(derivations::CriticalHitRule),
        Arc::new(derivations::CriticalFailRule),
        Arc::new(derivations::ModifierAggregationRule),
        Arc::new(derivations::DefenseRule),
        Arc::new(derivations::InitiativeRule),
        Arc::new(linked_records::MirrorRule),
        Arc::new(linked_records::FavoriteToggleRule),
        Arc::new(linked_records::AbbreviationRule),
        Arc::new(linked_records::SpellDamageRule),
        Arc::new(linked_records::PrimarySourceRule),
        Arc::new(linked_records::ActionRollFormulaRule),
    ]
}
