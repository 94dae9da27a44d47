//! Critical hit and critical fail ranges.
//!
//! Both rules only write when the formatted value differs from what is
//! stored, so re-running them is free of change events.

use mythcraft_domain::game_rules::{
    critical_fail_range, critical_hit_range, format_critical_fail, DEFAULT_CRITICAL_FAIL_BASE,
    DEFAULT_CRITICAL_HIT_BASE,
};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};

pub const CRITICAL_HIT: &str = "critical_hit";
pub const CRITICAL_FAIL: &str = "critical_fail";

const HIT_INPUTS: [&str; 3] = ["luck", "critical_hit_base", "critical_hit_modifier"];
const FAIL_INPUTS: [&str; 2] = ["critical_fail_base", "critical_fail_modifier"];

pub struct CriticalHitRule;

impl SheetRule for CriticalHitRule {
    fn name(&self) -> &'static str {
        "critical_hit"
    }

    fn triggers(&self) -> Vec<Trigger> {
        HIT_INPUTS.into_iter().map(Trigger::attribute).collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![Trigger::attribute(CRITICAL_HIT)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let values = ctx.values(&HIT_INPUTS)?;
        let base = values
            .opt_int("critical_hit_base")
            .unwrap_or(DEFAULT_CRITICAL_HIT_BASE);
        let hit = critical_hit_range(
            values.int("luck"),
            base,
            values.int("critical_hit_modifier"),
        )
        .to_attr_string();

        if ctx.get(CRITICAL_HIT)? != hit {
            ctx.set(CRITICAL_HIT, hit)?;
        }
        Ok(())
    }
}

pub struct CriticalFailRule;

impl SheetRule for CriticalFailRule {
    fn name(&self) -> &'static str {
        "critical_fail"
    }

    fn triggers(&self) -> Vec<Trigger> {
        FAIL_INPUTS.into_iter().map(Trigger::attribute).collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![Trigger::attribute(CRITICAL_FAIL)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let values = ctx.values(&FAIL_INPUTS)?;
        let base = values
            .opt_int("critical_fail_base")
            .unwrap_or(DEFAULT_CRITICAL_FAIL_BASE);
        let fail = format_critical_fail(critical_fail_range(
            base,
            values.int("critical_fail_modifier"),
        ));

        if ctx.get(CRITICAL_FAIL)? != fail {
            ctx.set(CRITICAL_FAIL, fail)?;
        }
        Ok(())
    }
}
