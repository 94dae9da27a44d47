//! Attribute point budget and level cap.

use mythcraft_domain::game_rules::{
    attribute_cap, compute_attribute_point_usage, validate_attributes, value_check_stored,
    AttributeScores, AttributeValidation,
};
use mythcraft_domain::{CharacterSheetValues, CoreAttribute, DomainError};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;

pub const ATTRIBUTE_CAP: &str = "attribute_cap";
pub const ATTRIBUTE_POINTS_SPENT: &str = "attribute_points_spent";
pub const ATTRIBUTE_POINTS_REMAINING: &str = "attribute_points_remaining";

/// Writes the level cap and point totals, and reports every validation
/// message as a diagnostic.
pub struct AttributeBudgetRule;

/// Every attribute the budget reads.
pub fn attribute_budget_inputs() -> Vec<String> {
    std::iter::once("level".to_string())
        .chain(CoreAttribute::all().iter().map(|attr| attr.as_str().to_string()))
        .collect()
}

/// The stored level; an unset level counts as 1.
fn stored_level(values: &CharacterSheetValues) -> i32 {
    values.opt_int("level").unwrap_or(1)
}

fn stored_scores(values: &CharacterSheetValues) -> AttributeScores {
    let mut scores = AttributeScores::new();
    for attribute in CoreAttribute::all() {
        let value = values
            .get(attribute.as_str())
            .map(value_check_stored)
            .unwrap_or(0);
        scores.set(attribute, value);
    }
    scores
}

/// Validate the attributes in `values`, read with [`attribute_budget_inputs`].
pub fn attribute_validation(values: &CharacterSheetValues) -> Result<AttributeValidation, DomainError> {
    validate_attributes(stored_level(values), &stored_scores(values))
}

impl SheetRule for AttributeBudgetRule {
    fn name(&self) -> &'static str {
        "attribute_budget"
    }

    fn triggers(&self) -> Vec<Trigger> {
        attribute_budget_inputs().into_iter().map(Trigger::Attribute).collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        [ATTRIBUTE_CAP, ATTRIBUTE_POINTS_SPENT, ATTRIBUTE_POINTS_REMAINING]
            .into_iter()
            .map(Trigger::attribute)
            .collect()
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let values = ctx.values(&attribute_budget_inputs())?;
        let level = stored_level(&values);
        let scores = stored_scores(&values);

        // An explicit level below 1 is a broken sheet, not a soft warning.
        let cap = attribute_cap(level)?;
        let usage = compute_attribute_point_usage(&scores);

        ctx.set_attrs(AttributeUpdate::from([
            (ATTRIBUTE_CAP.to_string(), cap.to_string()),
            (ATTRIBUTE_POINTS_SPENT.to_string(), usage.spent.to_string()),
            (ATTRIBUTE_POINTS_REMAINING.to_string(), usage.remaining.to_string()),
        ]))?;

        let validation = validate_attributes(level, &scores)?;
        let rule = self.name();
        ctx.diagnostics_clear(rule);
        for message in validation.errors {
            ctx.diagnostic(message);
        }
        Ok(())
    }
}
