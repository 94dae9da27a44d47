//! Defense totals and initiative.

use mythcraft_domain::game_rules::{defense_inputs, defense_total, initiative_total};
use mythcraft_domain::Defense;

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;

pub const INITIATIVE: &str = "initiative";

const INITIATIVE_INPUTS: [&str; 2] = ["initiative_bonus", "awareness"];

/// Writes every defense whose inputs were touched.
pub struct DefenseRule;

fn write_defenses(ctx: &mut SheetContext<'_>, defenses: &[Defense]) -> Result<(), RuleError> {
    let names: Vec<String> = defenses.iter().flat_map(|d| defense_inputs(*d)).collect();
    let values = ctx.values(&names)?;
    let update: AttributeUpdate = defenses
        .iter()
        .map(|defense| {
            (
                defense.as_str().to_string(),
                defense_total(*defense, &values).to_string(),
            )
        })
        .collect();
    ctx.set_attrs(update)?;
    Ok(())
}

impl SheetRule for DefenseRule {
    fn name(&self) -> &'static str {
        "defenses"
    }

    fn triggers(&self) -> Vec<Trigger> {
        Defense::all()
            .iter()
            .flat_map(|defense| defense_inputs(*defense))
            .map(Trigger::Attribute)
            .collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        Defense::all()
            .iter()
            .map(|defense| Trigger::attribute(defense.as_str()))
            .collect()
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let touched: Vec<Defense> = Defense::all()
            .into_iter()
            .filter(|defense| defense_inputs(*defense).contains(&event.source_attribute))
            .collect();
        write_defenses(ctx, &touched)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        write_defenses(ctx, &Defense::all())
    }
}

/// `initiative = initiative_bonus + awareness`.
pub struct InitiativeRule;

impl SheetRule for InitiativeRule {
    fn name(&self) -> &'static str {
        "initiative"
    }

    fn triggers(&self) -> Vec<Trigger> {
        INITIATIVE_INPUTS.into_iter().map(Trigger::attribute).collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![Trigger::attribute(INITIATIVE)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let values = ctx.values(&INITIATIVE_INPUTS)?;
        ctx.set(INITIATIVE, initiative_total(&values).to_string())
    }
}
