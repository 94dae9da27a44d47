//! Action points per round.

use mythcraft_domain::game_rules::action_points_with;

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};

pub const ACTION_POINTS_PER_ROUND: &str = "action_points_per_round";

const INPUTS: [&str; 3] = ["coordination", "action_points_base", "action_points_modifier"];

pub struct ActionPointsRule;

impl SheetRule for ActionPointsRule {
    fn name(&self) -> &'static str {
        "action_points"
    }

    fn triggers(&self) -> Vec<Trigger> {
        INPUTS.into_iter().map(Trigger::attribute).collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![Trigger::attribute(ACTION_POINTS_PER_ROUND)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let values = ctx.values(&INPUTS)?;
        let stats = action_points_with(
            values.int("coordination"),
            values.opt_int("action_points_base"),
            values.int("action_points_modifier"),
        );
        ctx.set(ACTION_POINTS_PER_ROUND, stats.total_ap.to_string())
    }
}
