//! Attacks synthesized from damaging spells.

use mythcraft_domain::game_rules::{
    attribute_abbreviation, critical_hit_enabled, spell_card_formula, spell_roll_formula,
};
use mythcraft_domain::{RowRef, Section};

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};
use crate::infrastructure::ports::AttributeUpdate;
use crate::use_cases::derivations::CRITICAL_HIT;

use super::abbreviation::{ABBREVIATION_FIELD, ATTRIBUTE_FIELD};
use super::LINK_FIELD;

pub const DAMAGE_FIELD: &str = "damage";
pub const ROLL_FORMULA_FIELD: &str = "roll_formula";
pub const SOURCE_FIELD: &str = "source";
pub const SPELLCASTING_ABILITY: &str = "spellcasting_ability";
pub const PRIMARY_SOURCE: &str = "primary_source";

/// Spell fields copied onto its attack. `damage` comes from the event.
const ATTACK_FIELDS: [&str; 6] = ["name", "damage_type", "range", "tags", "apc", "description"];

/// Lower-cased, trimmed source name for comparisons.
pub(super) fn normalize_source(source: &str) -> String {
    source.trim().to_lowercase()
}

/// Whether a spell from `source` is cast from the caster's primary source.
pub(super) fn is_primary_source(primary_source: &str, source: &str) -> bool {
    let primary = normalize_source(primary_source);
    !primary.is_empty() && primary == normalize_source(source)
}

/// Gives a spell an attack once it deals damage, and turns it back into a
/// description card when its damage is cleared. All writes are silent.
pub struct SpellDamageRule;

fn linked_attack(ctx: &SheetContext<'_>, spell: &RowRef) -> Result<Option<RowRef>, RuleError> {
    let Some(attack) = RowRef::from_link(&ctx.get(&spell.field(LINK_FIELD))?) else {
        return Ok(None);
    };
    if attack.section != Section::Attacks || !ctx.row_exists(&attack)? {
        return Ok(None);
    }
    Ok(Some(attack))
}

fn synthesize_attack(ctx: &mut SheetContext<'_>, spell: &RowRef, damage: &str) -> Result<(), RuleError> {
    if let Some(attack) = linked_attack(ctx, spell)? {
        tracing::debug!(spell = %spell, attack = %attack, "Spell already has an attack");
        return Ok(());
    }

    let mut names: Vec<String> = ATTACK_FIELDS.iter().map(|field| spell.field(field)).collect();
    names.push(spell.field(SOURCE_FIELD));
    names.push(SPELLCASTING_ABILITY.to_string());
    names.push(PRIMARY_SOURCE.to_string());
    names.push(CRITICAL_HIT.to_string());
    let values = ctx.get_attrs(&names)?;
    let read = |name: &str| values.get(name).cloned().unwrap_or_default();

    let ability = read(SPELLCASTING_ABILITY);
    let formula = spell_roll_formula(
        is_primary_source(&read(PRIMARY_SOURCE), &read(&spell.field(SOURCE_FIELD))),
        critical_hit_enabled(&read(CRITICAL_HIT)),
    );

    let attack = ctx.create_row(&Section::Attacks)?;
    let mut update: AttributeUpdate = ATTACK_FIELDS
        .iter()
        .map(|field| (attack.field(field), read(&spell.field(field))))
        .collect();
    update.insert(attack.field(DAMAGE_FIELD), damage.to_string());
    update.insert(attack.field(LINK_FIELD), spell.prefix());
    update.insert(attack.field(ABBREVIATION_FIELD), abbreviate(&ability));
    update.insert(attack.field(ATTRIBUTE_FIELD), ability);
    update.insert(attack.field(ROLL_FORMULA_FIELD), formula.clone());
    update.insert(spell.field(ROLL_FORMULA_FIELD), formula);
    update.insert(spell.field(LINK_FIELD), attack.prefix());

    ctx.set_attrs_silent(update)?;
    tracing::info!(spell = %spell, attack = %attack, "Synthesized spell attack");
    Ok(())
}

fn abbreviate(ability: &str) -> String {
    if ability.trim().is_empty() {
        String::new()
    } else {
        attribute_abbreviation(ability)
    }
}

impl SheetRule for SpellDamageRule {
    fn name(&self) -> &'static str {
        "spell_damage"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![Trigger::section_field(Section::Spells, DAMAGE_FIELD)]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let Some(spell) = event.row() else {
            return Ok(());
        };
        let had_damage = !event.previous_value.trim().is_empty();
        let has_damage = !event.new_value.trim().is_empty();

        match (had_damage, has_damage) {
            (false, true) => synthesize_attack(ctx, &spell, &event.new_value),
            // The link stays; the attack is the player's to delete.
            (true, false) => ctx.set_silent(spell.field(ROLL_FORMULA_FIELD), spell_card_formula()),
            _ => Ok(()),
        }
    }
}
