//! Modifier aggregation.
//!
//! Keeps `<target>_modifier` (or `initiative_bonus`) equal to the sum of
//! every active modifier record aimed at the target.

use std::collections::BTreeSet;

use mythcraft_domain::game_rules::modifiers::{
    MODIFIER_ACTIVE_FIELD, MODIFIER_ATTRIBUTE_FIELD, MODIFIER_VALUE_FIELD,
};
use mythcraft_domain::game_rules::{modifier_total, modifier_total_attr, ModifierEntry};
use mythcraft_domain::{is_modifiable, modifiable_names, Section};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;

pub struct ModifierAggregationRule;

/// Every modifier record currently on the sheet.
fn read_entries(ctx: &SheetContext<'_>) -> Result<Vec<ModifierEntry>, RuleError> {
    let rows = ctx.rows(&Section::Modifiers)?;
    let names: Vec<String> = rows
        .iter()
        .flat_map(|row| {
            [
                row.field(MODIFIER_ATTRIBUTE_FIELD),
                row.field(MODIFIER_VALUE_FIELD),
                row.field(MODIFIER_ACTIVE_FIELD),
            ]
        })
        .collect();
    let values = ctx.get_attrs(&names)?;
    let read = |name: String| values.get(&name).cloned().unwrap_or_default();

    Ok(rows
        .iter()
        .map(|row| {
            ModifierEntry::from_fields(
                &read(row.field(MODIFIER_ATTRIBUTE_FIELD)),
                &read(row.field(MODIFIER_VALUE_FIELD)),
                &read(row.field(MODIFIER_ACTIVE_FIELD)),
            )
        })
        .collect())
}

fn write_totals(
    ctx: &mut SheetContext<'_>,
    targets: &BTreeSet<String>,
) -> Result<(), RuleError> {
    if targets.is_empty() {
        return Ok(());
    }
    let entries = read_entries(ctx)?;
    let update: AttributeUpdate = targets
        .iter()
        .map(|target| {
            (
                modifier_total_attr(target),
                modifier_total(&entries, target).to_string(),
            )
        })
        .collect();
    tracing::debug!(targets = ?targets, "Recomputed modifier totals");
    ctx.set_attrs(update)?;
    Ok(())
}

impl SheetRule for ModifierAggregationRule {
    fn name(&self) -> &'static str {
        "modifier_aggregation"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![
            Trigger::section_field(Section::Modifiers, MODIFIER_ATTRIBUTE_FIELD),
            Trigger::section_field(Section::Modifiers, MODIFIER_VALUE_FIELD),
            Trigger::section_field(Section::Modifiers, MODIFIER_ACTIVE_FIELD),
            Trigger::RowRemoved(Section::Modifiers),
        ]
    }

    fn outputs(&self) -> Vec<Trigger> {
        modifiable_names()
            .into_iter()
            .map(|target| Trigger::Attribute(modifier_total_attr(target)))
            .collect()
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let mut targets = BTreeSet::new();

        if event.is_row_removal() {
            let target = event.removed_field(MODIFIER_ATTRIBUTE_FIELD).trim();
            if !target.is_empty() {
                targets.insert(target.to_string());
            }
            return write_totals(ctx, &targets);
        }

        let Some(row) = event.row() else {
            return Ok(());
        };
        let current = ctx.get(&row.field(MODIFIER_ATTRIBUTE_FIELD))?;
        let current = current.trim();
        if !current.is_empty() {
            targets.insert(current.to_string());
        }

        // Retargeting: the old target loses this record's contribution.
        if event.field().as_deref() == Some(MODIFIER_ATTRIBUTE_FIELD) {
            let previous = event.previous_value.trim();
            if is_modifiable(previous) {
                targets.insert(previous.to_string());
            }
        }

        write_totals(ctx, &targets)
    }

    fn recalculate(&self, ctx: &mut SheetContext<'_>) -> Result<(), RuleError> {
        let targets: BTreeSet<String> = read_entries(ctx)?
            .into_iter()
            .map(|entry| entry.attribute)
            .filter(|target| !target.is_empty())
            .collect();
        write_totals(ctx, &targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    fn modifier_sheet() -> TestSheet {
        sheet_with(vec![Arc::new(ModifierAggregationRule)], &[])
    }

    #[test]
    fn only_active_modifiers_are_summed() {
        let mut sheet = modifier_sheet();
        sheet.add(Section::Modifiers, &[("attribute", "strength"), ("modifier", "+2"), ("toggle_active", "on")]);
        sheet.add(Section::Modifiers, &[("attribute", "strength"), ("modifier", "+1"), ("toggle_active", "0")]);
        sheet.add(Section::Modifiers, &[("attribute", "strength"), ("modifier", "-1"), ("toggle_active", "on")]);

        assert_eq!(sheet.get("strength_modifier"), "1");
    }

    #[test]
    fn toggling_recomputes() {
        let mut sheet = modifier_sheet();
        let row = sheet.add(
            Section::Modifiers,
            &[("attribute", "logic"), ("modifier", "3"), ("toggle_active", "on")],
        );
        assert_eq!(sheet.get("logic_modifier"), "3");

        sheet.player_edit(&[(row.field("toggle_active").as_str(), "0")]);
        assert_eq!(sheet.get("logic_modifier"), "0");
    }

    #[test]
    fn retargeting_updates_both_totals() {
        let mut sheet = modifier_sheet();
        let row = sheet.add(
            Section::Modifiers,
            &[("attribute", "strength"), ("modifier", "2"), ("toggle_active", "on")],
        );
        assert_eq!(sheet.get("strength_modifier"), "2");

        let report = sheet.player_edit(&[(row.field("attribute").as_str(), "dexterity")]);
        assert_eq!(sheet.get("strength_modifier"), "0");
        assert_eq!(sheet.get("dexterity_modifier"), "2");
        assert!(report.is_clean());
    }

    #[test]
    fn initiative_goes_to_initiative_bonus() {
        let mut sheet = modifier_sheet();
        sheet.add(
            Section::Modifiers,
            &[("attribute", "initiative"), ("modifier", "2"), ("toggle_active", "on")],
        );
        assert_eq!(sheet.get("initiative_bonus"), "2");
        assert_eq!(sheet.get("initiative_modifier"), "");
    }

    #[test]
    fn removing_a_record_recomputes_its_target() {
        let mut sheet = modifier_sheet();
        sheet.add(
            Section::Modifiers,
            &[("attribute", "luck"), ("modifier", "1"), ("toggle_active", "on")],
        );
        let row = sheet.add(
            Section::Modifiers,
            &[("attribute", "luck"), ("modifier", "2"), ("toggle_active", "on")],
        );
        assert_eq!(sheet.get("luck_modifier"), "3");

        sheet.remove(&row);
        assert_eq!(sheet.get("luck_modifier"), "1");
    }
}
