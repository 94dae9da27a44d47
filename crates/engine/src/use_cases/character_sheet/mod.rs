//! Character sheet use cases.
//!
//! `CharacterSheet` is what a host drives: it owns the attribute store,
//! shares a rule registry, and turns host events (sheet opened, player edit,
//! record added or removed) into dispatched writes. Every operation returns
//! the `DispatchReport` of the cascade it caused.

mod error;

pub use error::CharacterSheetError;

use std::sync::Arc;

use mythcraft_domain::game_rules::{value_check, AttributeValidation};
use mythcraft_domain::{CharacterSheetValues, CoreAttribute, RowRef, Section};

use crate::dispatch::{ChangeDispatcher, ChangeOrigin, DispatchReport, SheetContext};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{AttributeStore, AttributeUpdate};
use crate::use_cases::derivations::{attribute_budget_inputs, attribute_validation};
use crate::use_cases::migrations::{MigrationChain, MigrationOutcome};

// =============================================================================
// Result Types
// =============================================================================

/// Result of adding a record.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    /// The new record, `None` when the store refused to create it.
    pub row: Option<RowRef>,
    pub report: DispatchReport,
}

// =============================================================================
// Character Sheet
// =============================================================================

pub struct CharacterSheet<S: AttributeStore> {
    store: S,
    dispatcher: Arc<ChangeDispatcher>,
    migrations: MigrationChain,
    config: EngineConfig,
}

impl<S: AttributeStore> CharacterSheet<S> {
    pub fn new(store: S, dispatcher: Arc<ChangeDispatcher>, config: EngineConfig) -> Self {
        Self {
            store,
            dispatcher,
            migrations: MigrationChain::standard(),
            config,
        }
    }

    /// A sheet with its own registry of every built-in rule.
    pub fn with_standard_rules(store: S, config: EngineConfig) -> Result<Self, CharacterSheetError> {
        let dispatcher = ChangeDispatcher::standard()?;
        Ok(Self::new(store, Arc::new(dispatcher), config))
    }

    /// Replace the migration chain run by [`CharacterSheet::open`].
    pub fn with_migrations(mut self, migrations: MigrationChain) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn dispatcher(&self) -> &Arc<ChangeDispatcher> {
        &self.dispatcher
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Run `operation` in a fresh top-level context.
    fn run<T>(
        &mut self,
        origin: ChangeOrigin,
        operation: impl FnOnce(&mut SheetContext<'_>) -> T,
    ) -> (T, DispatchReport) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let max_depth = self.config.max_dispatch_depth;
        let mut report = DispatchReport::default();
        let output = {
            let mut ctx =
                SheetContext::new(&mut self.store, &dispatcher, &mut report, origin, max_depth);
            operation(&mut ctx)
        };
        (output, report)
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// The sheet was opened: bring it up to the latest version.
    pub fn open(&mut self) -> MigrationOutcome {
        let migrations = self.migrations.clone();
        let (run, report) = self.run(ChangeOrigin::Migration, |ctx| migrations.run(ctx));
        MigrationOutcome::new(run, report)
    }

    /// Write `update` and dispatch every resulting change.
    pub fn set_attrs(&mut self, update: AttributeUpdate, origin: ChangeOrigin) -> DispatchReport {
        let (_, report) = self.run(origin, |ctx| {
            let subject = update.keys().cloned().collect::<Vec<_>>().join(", ");
            if let Err(error) = ctx.set_attrs(update) {
                tracing::warn!(attributes = %subject, error = %error, "Sheet write failed");
                ctx.record_failure(subject, &error);
            }
        });
        report
    }

    /// Create a record in `section` and write its fields, keyed by field name.
    pub fn add_row(
        &mut self,
        section: &Section,
        fields: AttributeUpdate,
        origin: ChangeOrigin,
    ) -> RowOutcome {
        let (row, report) = self.run(origin, |ctx| {
            let row = match ctx.create_row(section) {
                Ok(row) => row,
                Err(error) => {
                    tracing::warn!(section = %section, error = %error, "Record creation failed");
                    ctx.record_failure(section.prefix(), &error);
                    return None;
                }
            };

            let update: AttributeUpdate = fields
                .into_iter()
                .map(|(field, value)| (row.field(&field), value))
                .collect();
            if let Err(error) = ctx.set_attrs(update) {
                tracing::warn!(row = %row, error = %error, "Record write failed");
                ctx.record_failure(row.prefix(), &error);
            }
            Some(row)
        });
        RowOutcome { row, report }
    }

    /// Delete a record and dispatch its removal.
    pub fn remove_row(&mut self, row: &RowRef, origin: ChangeOrigin) -> DispatchReport {
        let (_, report) = self.run(origin, |ctx| {
            if let Err(error) = ctx.remove_row(row) {
                tracing::warn!(row = %row, error = %error, "Record removal failed");
                ctx.record_failure(row.prefix(), &error);
            }
        });
        report
    }

    /// Charactermancer `+`/`-` buttons: move an attribute by `delta`,
    /// clamped to the allowed range.
    pub fn adjust_attribute(&mut self, attribute: CoreAttribute, delta: i32) -> DispatchReport {
        let name = attribute.as_str();
        let (_, report) = self.run(ChangeOrigin::Player, |ctx| {
            let result = ctx.values(&[name]).and_then(|values| {
                let adjusted = value_check(values.int(name).saturating_add(delta));
                ctx.set(name, adjusted.to_string())
            });
            if let Err(error) = result {
                tracing::warn!(attribute = name, error = %error, "Attribute adjustment failed");
                ctx.record_failure(name, &error);
            }
        });
        report
    }

    /// Validate the attribute scores currently on the sheet.
    pub fn validate_attributes(&self) -> Result<AttributeValidation, CharacterSheetError> {
        let raw = self.store.get_attrs(&attribute_budget_inputs())?;
        Ok(attribute_validation(&CharacterSheetValues::from_raw(&raw))?)
    }

    /// Re-run every rule's full recalculation once. Repairs sheets written
    /// by something that bypassed the rules, such as a bulk import.
    pub fn recalculate(&mut self) -> DispatchReport {
        let (_, report) = self.run(ChangeOrigin::Worker, |ctx| ctx.recalculate_all());
        tracing::info!(
            changes = report.changes.len(),
            failures = report.failures.len(),
            "Recalculated sheet"
        );
        report
    }
}

impl<S: AttributeStore + std::fmt::Debug> std::fmt::Debug for CharacterSheet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterSheet")
            .field("store", &self.store)
            .field("dispatcher", &self.dispatcher)
            .field("config", &self.config)
            .finish()
    }
}
