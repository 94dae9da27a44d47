//! Shared fixtures for rule tests.

use std::sync::Arc;

use mythcraft_domain::{RowRef, Section};

use crate::dispatch::{ChangeDispatcher, ChangeOrigin, DispatchReport, SheetRule};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory_store::InMemoryAttributeStore;
use crate::infrastructure::ports::AttributeUpdate;
use crate::use_cases::CharacterSheet;

pub type TestSheet = CharacterSheet<InMemoryAttributeStore>;

fn update(pairs: &[(&str, &str)]) -> AttributeUpdate {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// A sheet seeded with `pairs` (no rules run) and only `rules` registered.
pub fn sheet_with(rules: Vec<Arc<dyn SheetRule>>, pairs: &[(&str, &str)]) -> TestSheet {
    let mut dispatcher = ChangeDispatcher::empty();
    for rule in rules {
        dispatcher.register(rule).unwrap();
    }
    let store = InMemoryAttributeStore::from_attributes(pairs.iter().copied());
    CharacterSheet::new(store, Arc::new(dispatcher), EngineConfig::default())
}

/// A sheet seeded with `pairs` and every built-in rule.
pub fn standard_sheet(pairs: &[(&str, &str)]) -> TestSheet {
    let store = InMemoryAttributeStore::from_attributes(pairs.iter().copied());
    CharacterSheet::with_standard_rules(store, EngineConfig::default()).unwrap()
}

pub trait TestSheetExt {
    /// Apply edits as the player would.
    fn player_edit(&mut self, pairs: &[(&str, &str)]) -> DispatchReport;
    /// Apply edits as an import would.
    fn worker_edit(&mut self, pairs: &[(&str, &str)]) -> DispatchReport;
    fn get(&self, name: &str) -> String;
    /// Add a record as the player, returning it.
    fn add(&mut self, section: Section, fields: &[(&str, &str)]) -> RowRef;
    fn remove(&mut self, row: &RowRef) -> DispatchReport;
}

impl TestSheetExt for TestSheet {
    fn player_edit(&mut self, pairs: &[(&str, &str)]) -> DispatchReport {
        self.set_attrs(update(pairs), ChangeOrigin::Player)
    }

    fn worker_edit(&mut self, pairs: &[(&str, &str)]) -> DispatchReport {
        self.set_attrs(update(pairs), ChangeOrigin::Worker)
    }

    fn get(&self, name: &str) -> String {
        self.store().get(name).to_string()
    }

    fn add(&mut self, section: Section, fields: &[(&str, &str)]) -> RowRef {
        let outcome = self.add_row(&section, update(fields), ChangeOrigin::Player);
        assert!(outcome.report.is_clean(), "{:?}", outcome.report.failures);
        outcome.row.unwrap()
    }

    fn remove(&mut self, row: &RowRef) -> DispatchReport {
        self.remove_row(row, ChangeOrigin::Player)
    }
}
