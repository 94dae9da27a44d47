//! Creature action roll formulas.

use mythcraft_domain::game_rules::{action_roll_formula, ActionFormulaOptions};
use mythcraft_domain::{CharacterSheetValues, RowRef, Section};

use crate::dispatch::{ChangeEvent, ChangeOrigin, RuleError, SheetContext, SheetRule, Trigger};

use super::spell_attack::{DAMAGE_FIELD, ROLL_FORMULA_FIELD};

pub const TOGGLE_ATTACK_FIELD: &str = "toggle_attack";
const DEFENSE_FIELD: &str = "defense";
const EFFECT_FIELD: &str = "effect";

/// Fields whose presence decides which segments an attack's formula shows.
const SEGMENT_FIELDS: [&str; 3] = [DAMAGE_FIELD, DEFENSE_FIELD, EFFECT_FIELD];

pub struct ActionRollFormulaRule;

fn formula_options(values: &CharacterSheetValues, row: &RowRef) -> ActionFormulaOptions {
    let present = |field: &str| !values.is_blank(&row.field(field));
    ActionFormulaOptions {
        include_dice: true,
        include_defense: present(DEFENSE_FIELD),
        include_damage: present(DAMAGE_FIELD),
        include_effect: present(EFFECT_FIELD),
    }
}

impl SheetRule for ActionRollFormulaRule {
    fn name(&self) -> &'static str {
        "action_roll_formula"
    }

    fn triggers(&self) -> Vec<Trigger> {
        std::iter::once(TOGGLE_ATTACK_FIELD)
            .chain(SEGMENT_FIELDS)
            .map(|field| Trigger::section_field(Section::Actions, field))
            .collect()
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![Trigger::section_field(Section::Actions, ROLL_FORMULA_FIELD)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let (Some(row), Some(field)) = (event.row(), event.field()) else {
            return Ok(());
        };
        // Imports write complete formulas themselves.
        if field == TOGGLE_ATTACK_FIELD && event.origin != ChangeOrigin::Player {
            return Ok(());
        }

        let names: Vec<String> = std::iter::once(TOGGLE_ATTACK_FIELD)
            .chain(SEGMENT_FIELDS)
            .map(|field| row.field(field))
            .collect();
        let values = ctx.values(&names)?;
        let is_attack = values.flag(&row.field(TOGGLE_ATTACK_FIELD));
        if !is_attack && field != TOGGLE_ATTACK_FIELD {
            return Ok(());
        }

        let formula = action_roll_formula(is_attack, formula_options(&values, &row));
        if ctx.get(&row.field(ROLL_FORMULA_FIELD))? != formula {
            ctx.set(row.field(ROLL_FORMULA_FIELD), formula)?;
        }
        Ok(())
    }
}
