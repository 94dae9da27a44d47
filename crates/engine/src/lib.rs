//! Mythcraft sheet engine library.
//!
//! Reacts to attribute changes on a character sheet and keeps every derived
//! value, linked record and schema version consistent.
//!
//! ## Structure
//!
//! - `dispatch/` - change events, the rule registry and the sheet context
//! - `use_cases/` - derivation rules, linked-record rules, migrations and
//!   the `CharacterSheet` facade
//! - `infrastructure/` - the attribute store port, its in-memory adapter
//!   and configuration

pub mod dispatch;
pub mod infrastructure;
pub mod use_cases;

/// End-to-end tests driving a fully wired sheet.
#[cfg(test)]
mod e2e_tests;

pub use dispatch::{ChangeDispatcher, ChangeOrigin, DispatchReport, SheetRule};
pub use infrastructure::config::EngineConfig;
pub use infrastructure::memory_store::InMemoryAttributeStore;
pub use infrastructure::ports::{AttributeStore, AttributeUpdate, StoreError};
pub use use_cases::{CharacterSheet, CharacterSheetError, MigrationOutcome};
