//! Rule registry.

use std::sync::Arc;

use super::context::SheetContext;
use super::error::{DispatchError, RuleError};
use super::event::{ChangeEvent, Trigger};
use crate::use_cases;

/// A derivation or synchronization rule.
///
/// Rules declare what they react to and which attributes they write with
/// notification. Silent writes are not declared; they never re-enter the
/// dispatcher.
pub trait SheetRule: Send + Sync {
    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;

    fn triggers(&self) -> Vec<Trigger>;

    /// Attributes written with notification.
    fn outputs(&self) -> Vec<Trigger> {
        Vec::new()
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError>;

    /// Recompute everything the rule owns from current inputs. Used to
    /// repair imported sheets; event-only rules keep the default no-op.
    fn recalculate(&self, _ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        Ok(())
    }
}

/// A rule with its triggers resolved once at registration.
pub struct RegisteredRule {
    pub(crate) rule: Arc<dyn SheetRule>,
    pub(crate) triggers: Vec<Trigger>,
}

impl RegisteredRule {
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn is_triggered_by(&self, event: &ChangeEvent) -> bool {
        self.triggers.iter().any(|trigger| trigger.matches(event))
    }
}

/// Routes change events to the rules registered for them, in registration
/// order. Shared behind an `Arc` so one registry serves many sheets.
#[derive(Default)]
pub struct ChangeDispatcher {
    rules: Vec<RegisteredRule>,
}

impl ChangeDispatcher {
    /// Create an empty dispatcher without any rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a dispatcher with every built-in derivation and
    /// synchronization rule.
    pub fn standard() -> Result<Self, DispatchError> {
        let mut dispatcher = Self::empty();
        for rule in use_cases::standard_rules() {
            dispatcher.register(rule)?;
        }
        Ok(dispatcher)
    }

    /// Register a rule, rejecting one whose notifying outputs overlap its
    /// own triggers.
    pub fn register(&mut self, rule: Arc<dyn SheetRule>) -> Result<(), DispatchError> {
        let name = rule.name();
        if self.get(name).is_some() {
            return Err(DispatchError::DuplicateRule(name));
        }

        let triggers = rule.triggers();
        for output in rule.outputs() {
            if triggers.iter().any(|trigger| trigger.overlaps(&output)) {
                return Err(DispatchError::SelfTriggering {
                    rule: name,
                    output: output.to_string(),
                });
            }
        }

        tracing::debug!(rule = name, triggers = triggers.len(), "Registered sheet rule");
        self.rules.push(RegisteredRule { rule, triggers });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SheetRule>> {
        self.rules
            .iter()
            .find(|registered| registered.name() == name)
            .map(|registered| registered.rule.clone())
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RegisteredRule::name).collect()
    }

    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    /// Rules that fire for `event`, in registration order.
    pub fn rules_for<'a>(&'a self, event: &'a ChangeEvent) -> impl Iterator<Item = &'a RegisteredRule> + 'a {
        self.rules
            .iter()
            .filter(move |registered| registered.is_triggered_by(event))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for ChangeDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDispatcher")
            .field("rules", &self.rule_names())
            .finish()
    }
}
