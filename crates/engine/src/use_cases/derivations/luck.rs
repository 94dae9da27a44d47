//! Luck points, the negative-luck roll penalty and critical damage.

use mythcraft_domain::game_rules::luck_stats;

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;

pub const LUCK_POINTS: &str = "luck_points";
pub const LUCK_NEGATIVE_MODIFIER: &str = "luck_negative_modifier";
pub const CRITICAL_DAMAGE_BONUS: &str = "critical_damage_bonus";

pub struct LuckRule;

impl SheetRule for LuckRule {
    fn name(&self) -> &'static str {
        "luck"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![Trigger::attribute("luck")]
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![
            Trigger::attribute(LUCK_POINTS),
            Trigger::attribute(LUCK_NEGATIVE_MODIFIER),
            Trigger::attribute(CRITICAL_DAMAGE_BONUS),
        ]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, _event: &ChangeEvent) -> Result<(), RuleError> {
        self.recalculate(ctx)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let luck = ctx.values(&["luck"])?.int("luck");
        let stats = luck_stats(luck);

        ctx.set_attrs(AttributeUpdate::from([
            (LUCK_POINTS.to_string(), stats.luck_points.to_string()),
            (
                LUCK_NEGATIVE_MODIFIER.to_string(),
                stats.d20_modifier_from_luck.to_string(),
            ),
            (
                CRITICAL_DAMAGE_BONUS.to_string(),
                stats.crit_damage_bonus.to_string(),
            ),
        ]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    #[test]
    fn negative_luck_sets_roll_penalty() {
        let mut sheet = sheet_with(vec![Arc::new(LuckRule)], &[]);
        sheet.player_edit(&[("luck", "-4")]);

        assert_eq!(sheet.get(LUCK_POINTS), "0");
        assert_eq!(sheet.get(LUCK_NEGATIVE_MODIFIER), "-4");
        assert_eq!(sheet.get(CRITICAL_DAMAGE_BONUS), "0");
    }

    #[test]
    fn positive_luck_grants_points_and_bonus() {
        let mut sheet = sheet_with(vec![Arc::new(LuckRule)], &[]);
        sheet.player_edit(&[("luck", "7")]);

        assert_eq!(sheet.get(LUCK_POINTS), "3");
        assert_eq!(sheet.get(LUCK_NEGATIVE_MODIFIER), "0");
        assert_eq!(sheet.get(CRITICAL_DAMAGE_BONUS), "7");
    }

    #[test]
    fn non_numeric_luck_reads_as_zero() {
        let mut sheet = sheet_with(vec![Arc::new(LuckRule)], &[]);
        let report = sheet.player_edit(&[("luck", "lots")]);

        assert!(report.is_clean());
        assert_eq!(sheet.get(LUCK_POINTS), "0");
    }
}
