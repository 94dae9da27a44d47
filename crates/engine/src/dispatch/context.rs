//! The handle rules use to read and write the sheet.
//!
//! A notifying write goes to the store first, then every changed attribute
//! is dispatched to the rules subscribed to it before the write returns.
//! Silent writes stop at the store.

use std::collections::HashMap;

use mythcraft_domain::{CharacterSheetValues, RowId, RowRef, Section};

use super::error::RuleError;
use super::event::{ChangeEvent, ChangeOrigin, Trigger};
use super::registry::{ChangeDispatcher, RegisteredRule};
use super::report::DispatchReport;
use crate::infrastructure::ports::{AttributeChange, AttributeStore, AttributeUpdate, WriteOptions};

/// Name recorded for writes made outside any rule.
const SHEET_SCOPE: &str = "sheet";

/// The rule currently applying, used for the self-trigger check.
struct RuleScope<'a> {
    name: &'static str,
    triggers: &'a [Trigger],
}

pub struct SheetContext<'a> {
    store: &'a mut dyn AttributeStore,
    dispatcher: &'a ChangeDispatcher,
    report: &'a mut DispatchReport,
    origin: ChangeOrigin,
    depth: u32,
    max_depth: u32,
    scope: Option<RuleScope<'a>>,
}

impl<'a> SheetContext<'a> {
    /// A top-level context for one sheet operation.
    pub fn new(
        store: &'a mut dyn AttributeStore,
        dispatcher: &'a ChangeDispatcher,
        report: &'a mut DispatchReport,
        origin: ChangeOrigin,
        max_depth: u32,
    ) -> Self {
        Self {
            store,
            dispatcher,
            report,
            origin,
            depth: 0,
            max_depth,
            scope: None,
        }
    }

    /// Origin stamped on events caused by writes through this context.
    pub fn origin(&self) -> ChangeOrigin {
        self.origin
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Name of the rule this context belongs to, `"sheet"` at top level.
    pub fn rule_name(&self) -> &'static str {
        self.scope.as_ref().map_or(SHEET_SCOPE, |scope| scope.name)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_attrs<S: AsRef<str>>(&self, names: &[S]) -> Result<HashMap<String, String>, RuleError> {
        let names: Vec<String> = names.iter().map(|name| name.as_ref().to_string()).collect();
        Ok(self.store.get_attrs(&names)?)
    }

    /// Read a batch and parse every value once.
    pub fn values<S: AsRef<str>>(&self, names: &[S]) -> Result<CharacterSheetValues, RuleError> {
        Ok(CharacterSheetValues::from_raw(&self.get_attrs(names)?))
    }

    /// Read one attribute; `""` when missing.
    pub fn get(&self, name: &str) -> Result<String, RuleError> {
        let mut values = self.get_attrs(&[name])?;
        Ok(values.remove(name).unwrap_or_default())
    }

    pub fn section_row_ids(&self, section: &Section) -> Result<Vec<RowId>, RuleError> {
        Ok(self.store.section_row_ids(section)?)
    }

    pub fn rows(&self, section: &Section) -> Result<Vec<RowRef>, RuleError> {
        Ok(self
            .section_row_ids(section)?
            .into_iter()
            .map(|row_id| RowRef::new(section.clone(), row_id))
            .collect())
    }

    /// Whether `row` is currently a record of its section.
    pub fn row_exists(&self, row: &RowRef) -> Result<bool, RuleError> {
        Ok(self.section_row_ids(&row.section)?.contains(&row.row_id))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write and notify subscribers of every attribute that changed.
    pub fn set_attrs(&mut self, update: AttributeUpdate) -> Result<Vec<AttributeChange>, RuleError> {
        if let Some(scope) = &self.scope {
            if let Some(name) = update
                .keys()
                .find(|name| scope.triggers.iter().any(|t| t.matches_attribute(name)))
            {
                return Err(RuleError::self_trigger(scope.name, name.clone()));
            }
        }

        let changes = self.store.set_attrs(&update, WriteOptions::notify())?;
        self.report.record_changes(&changes);
        for change in &changes {
            let event = ChangeEvent::updated(change, self.origin);
            self.dispatch(&event);
        }
        Ok(changes)
    }

    /// Write without notifying anyone.
    pub fn set_attrs_silent(&mut self, update: AttributeUpdate) -> Result<Vec<AttributeChange>, RuleError> {
        let changes = self.store.set_attrs(&update, WriteOptions::silent())?;
        self.report.record_changes(&changes);
        Ok(changes)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<(), RuleError> {
        self.set_attrs(AttributeUpdate::from([(name.into(), value.into())]))?;
        Ok(())
    }

    pub fn set_silent(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RuleError> {
        self.set_attrs_silent(AttributeUpdate::from([(name.into(), value.into())]))?;
        Ok(())
    }

    pub fn create_row(&mut self, section: &Section) -> Result<RowRef, RuleError> {
        let row = self.store.create_row(section)?;
        tracing::debug!(row = %row, rule = self.rule_name(), "Created record");
        Ok(row)
    }

    /// Delete a record and notify `RowRemoved` subscribers.
    pub fn remove_row(&mut self, row: &RowRef) -> Result<HashMap<String, String>, RuleError> {
        let removed = self.store.remove_row(row)?;
        let changes: Vec<AttributeChange> = removed
            .iter()
            .map(|(name, value)| AttributeChange::new(name.clone(), value.clone(), ""))
            .collect();
        self.report.record_changes(&changes);
        tracing::debug!(row = %row, fields = removed.len(), rule = self.rule_name(), "Removed record");

        let event = ChangeEvent::row_removed(row, removed.clone(), self.origin);
        self.dispatch(&event);
        Ok(removed)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    pub fn diagnostic(&mut self, message: impl Into<String>) {
        let rule = self.rule_name();
        self.report.record_diagnostic(rule, message);
    }

    pub fn diagnostics_clear(&mut self, rule: &str) {
        self.report.diagnostics.retain(|diagnostic| diagnostic.rule != rule);
    }

    /// Record a failure without aborting the caller.
    pub fn record_failure(&mut self, subject: impl Into<String>, error: impl ToString) {
        let rule = self.rule_name();
        self.report.record_failure(rule, subject, error);
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn child<'b>(&'b mut self, registered: &'b RegisteredRule) -> SheetContext<'b> {
        SheetContext {
            store: &mut *self.store,
            dispatcher: self.dispatcher,
            report: &mut *self.report,
            origin: ChangeOrigin::Worker,
            depth: self.depth + 1,
            max_depth: self.max_depth,
            scope: Some(RuleScope {
                name: registered.name(),
                triggers: registered.triggers(),
            }),
        }
    }

    /// Deliver `event` to every subscribed rule. Failures are logged and
    /// recorded; the remaining rules still run.
    pub fn dispatch(&mut self, event: &ChangeEvent) {
        if self.depth >= self.max_depth {
            tracing::error!(
                attribute = %event.source_attribute,
                depth = self.depth,
                max_depth = self.max_depth,
                "Dispatch depth exceeded, not descending further"
            );
            self.record_failure(
                event.source_attribute.clone(),
                format!("dispatch depth {} exceeded", self.max_depth),
            );
            return;
        }

        let dispatcher = self.dispatcher;
        for registered in dispatcher.rules_for(event) {
            tracing::trace!(
                rule = registered.name(),
                attribute = %event.source_attribute,
                origin = %event.origin,
                depth = self.depth,
                "Applying sheet rule"
            );
            let result = {
                let mut child = self.child(registered);
                registered.rule.apply(&mut child, event)
            };
            if let Err(error) = result {
                tracing::warn!(
                    rule = registered.name(),
                    attribute = %event.source_attribute,
                    error = %error,
                    "Sheet rule failed"
                );
                self.report
                    .record_failure(registered.name(), event.source_attribute.clone(), &error);
            }
        }
    }

    /// Run every rule's full recalculation once, in registration order.
    pub fn recalculate_all(&mut self) {
        let dispatcher = self.dispatcher;
        for registered in dispatcher.rules() {
            let result = {
                let mut child = self.child(registered);
                registered.rule.recalculate(&mut child)
            };
            if let Err(error) = result {
                tracing::warn!(rule = registered.name(), error = %error, "Recalculation failed");
                self.report.record_failure(registered.name(), SHEET_SCOPE, &error);
            }
        }
    }
}
