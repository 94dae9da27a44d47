//! Re-derive spell formulas when the caster's primary source or ability to
//! crit changes.

use mythcraft_domain::game_rules::{critical_hit_enabled, spell_roll_formula};
use mythcraft_domain::{RowRef, Section};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;
use crate::use_cases::derivations::CRITICAL_HIT;

use super::spell_attack::{
    is_primary_source, normalize_source, DAMAGE_FIELD, PRIMARY_SOURCE, ROLL_FORMULA_FIELD,
    SOURCE_FIELD,
};
use super::LINK_FIELD;

/// Rewrites the roll formula of damaging spells, and of their linked
/// attacks, when a formula input changes:
/// - `primary_source`: spells whose source gained or lost primary status
/// - `critical_hit`: every damaging spell, when crits turn on or off
pub struct PrimarySourceRule;

/// Rewrite the formulas of damaging spells whose normalized source passes
/// `affected`.
fn rederive_spell_formulas(
    ctx: &mut SheetContext<'_>,
    affected: impl Fn(&str) -> bool,
) -> Result<(), RuleError> {
    let spells = ctx.rows(&Section::Spells)?;
    let mut names: Vec<String> = spells
        .iter()
        .flat_map(|spell| {
            [
                spell.field(SOURCE_FIELD),
                spell.field(DAMAGE_FIELD),
                spell.field(LINK_FIELD),
            ]
        })
        .collect();
    names.push(PRIMARY_SOURCE.to_string());
    names.push(CRITICAL_HIT.to_string());
    let values = ctx.get_attrs(&names)?;
    let read = |name: &str| values.get(name).cloned().unwrap_or_default();

    let primary = read(PRIMARY_SOURCE);
    let can_crit = critical_hit_enabled(&read(CRITICAL_HIT));

    let mut update = AttributeUpdate::new();
    for spell in &spells {
        let source = normalize_source(&read(&spell.field(SOURCE_FIELD)));
        if !affected(&source) {
            continue;
        }
        // Spell cards have no dice to adjust.
        if read(&spell.field(DAMAGE_FIELD)).trim().is_empty() {
            continue;
        }

        let formula = spell_roll_formula(is_primary_source(&primary, &source), can_crit);
        if let Some(attack) = RowRef::from_link(&read(&spell.field(LINK_FIELD))) {
            if attack.section == Section::Attacks && ctx.row_exists(&attack)? {
                update.insert(attack.field(ROLL_FORMULA_FIELD), formula.clone());
            }
        }
        update.insert(spell.field(ROLL_FORMULA_FIELD), formula);
    }

    if update.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        primary_source = %primary,
        can_crit,
        attributes = update.len(),
        "Re-derived spell formulas"
    );
    ctx.set_attrs_silent(update)?;
    Ok(())
}

impl SheetRule for PrimarySourceRule {
    fn name(&self) -> &'static str {
        "primary_source"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![
            Trigger::attribute(PRIMARY_SOURCE),
            Trigger::attribute(CRITICAL_HIT),
        ]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        if event.source_attribute == CRITICAL_HIT {
            let was_enabled = critical_hit_enabled(&event.previous_value);
            if was_enabled == critical_hit_enabled(&event.new_value) {
                return Ok(());
            }
            return rederive_spell_formulas(ctx, |_| true);
        }

        let previous = normalize_source(&event.previous_value);
        let current = normalize_source(&event.new_value);
        rederive_spell_formulas(ctx, |source| {
            !source.is_empty() && (source == previous || source == current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    fn source_sheet() -> TestSheet {
        sheet_with(
            vec![Arc::new(PrimarySourceRule)],
            &[
                ("primary_source", "arcane"),
                ("repeating_spells_-s1_source", "Arcane"),
                ("repeating_spells_-s1_damage", "2d6"),
                ("repeating_spells_-s1_link", "repeating_attacks_-a1"),
                ("repeating_attacks_-a1_name", "Firebolt"),
                ("repeating_spells_-s2_source", "Divine"),
                ("repeating_spells_-s2_damage", "1d8"),
                ("repeating_spells_-s3_source", "Divine"),
                ("repeating_spells_-s3_roll_formula", "{{description=@{description}}}"),
                ("repeating_spells_-s4_source", "Primal"),
                ("repeating_spells_-s4_damage", "1d4"),
            ],
        )
    }

    #[test]
    fn old_and_new_primary_sources_are_rederived() {
        let mut sheet = source_sheet();
        sheet.player_edit(&[("primary_source", "divine")]);

        assert_eq!(
            sheet.get("repeating_spells_-s1_roll_formula"),
            spell_roll_formula(false, true)
        );
        assert_eq!(
            sheet.get("repeating_attacks_-a1_roll_formula"),
            spell_roll_formula(false, true)
        );
        assert_eq!(
            sheet.get("repeating_spells_-s2_roll_formula"),
            spell_roll_formula(true, true)
        );
    }

    #[test]
    fn cards_and_unrelated_sources_are_untouched() {
        let mut sheet = source_sheet();
        let report = sheet.player_edit(&[("primary_source", "divine")]);

        assert_eq!(
            sheet.get("repeating_spells_-s3_roll_formula"),
            "{{description=@{description}}}"
        );
        assert_eq!(sheet.get("repeating_spells_-s4_roll_formula"), "");
        assert_eq!(report.changes_to("repeating_spells_-s3_roll_formula").count(), 0);
    }

    #[test]
    fn losing_crits_rewrites_every_damaging_spell() {
        let mut sheet = source_sheet();
        sheet.worker_edit(&[("critical_hit", ">20")]);
        assert_eq!(sheet.get("repeating_spells_-s2_roll_formula"), "");

        sheet.worker_edit(&[("critical_hit", "0")]);
        assert_eq!(
            sheet.get("repeating_spells_-s1_roll_formula"),
            spell_roll_formula(true, false)
        );
        assert_eq!(
            sheet.get("repeating_attacks_-a1_roll_formula"),
            spell_roll_formula(true, false)
        );
        assert_eq!(
            sheet.get("repeating_spells_-s4_roll_formula"),
            spell_roll_formula(false, false)
        );
        assert_eq!(
            sheet.get("repeating_spells_-s3_roll_formula"),
            "{{description=@{description}}}"
        );

        sheet.worker_edit(&[("critical_hit", ">19")]);
        assert_eq!(
            sheet.get("repeating_spells_-s1_roll_formula"),
            spell_roll_formula(true, true)
        );
    }
}
