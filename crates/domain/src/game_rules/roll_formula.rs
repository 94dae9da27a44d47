//! Roll-formula text for spells and creature actions.
//!
//! The formulas use the host's roll template syntax: `@{attr}` references,
//! `[[...]]` inline dice, `?{prompt|default}` queries and `{{key=value}}`
//! template segments. Only the text is produced here.

const DESCRIPTION: &str = "{{description=@{description}}}";

const ACTION_DICE: &str = "{{dice=[[1d20+(@{modifier})+(?{TA/TD|0}[tactical bonus])]]}}";
const ACTION_DEFENSE: &str = "{{action=@{range} @{type}. @{modifier} vs @{defense} }}";
const ACTION_DAMAGE: &str = "{{damage=[Damage](~repeating_actions-roll_damage)}}";
const ACTION_EFFECT: &str = "{{effect=[Effect](~repeating_actions-roll_effect)}}";

const CRITICAL_SUCCESS: &str = "cs@{critical_hit}";

/// Formula for a spell that deals damage.
///
/// Spells from the caster's primary source add the full spellcasting
/// ability; any other source adds half of it, rounded up. The critical
/// success threshold is left out while the caster cannot crit.
pub fn spell_roll_formula(is_primary_source: bool, can_crit: bool) -> String {
    let ability = if is_primary_source {
        "@{spellcasting_ability}"
    } else {
        "ceil(@{spellcasting_ability}/2)"
    };
    let critical = if can_crit { CRITICAL_SUCCESS } else { "" };

    format!(
        "{{{{dice=[[1d20+{ability}[ability]+(@{{bonus}}[bonus])+(?{{TA/TD|0}})[tactical bonus]\
         +(@{{luck_negative_modifier}}[negative luck modifier]){critical}]]}}}} \
         {{{{damage=[Damage](~repeating_spells-roll_damage)}}}} {DESCRIPTION}"
    )
}

/// Formula for a spell without damage: a card showing its description.
pub fn spell_card_formula() -> String {
    DESCRIPTION.to_string()
}

/// Which segments an attack action's formula includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFormulaOptions {
    pub include_dice: bool,
    pub include_defense: bool,
    pub include_damage: bool,
    pub include_effect: bool,
}

impl Default for ActionFormulaOptions {
    fn default() -> Self {
        Self {
            include_dice: true,
            include_defense: true,
            include_damage: true,
            include_effect: true,
        }
    }
}

/// Formula for a creature action. Non-attacks only show their description.
pub fn action_roll_formula(is_attack: bool, options: ActionFormulaOptions) -> String {
    if !is_attack {
        return DESCRIPTION.to_string();
    }

    let segments = [
        (options.include_dice, ACTION_DICE),
        (options.include_defense, ACTION_DEFENSE),
        (options.include_damage, ACTION_DAMAGE),
        (options.include_effect, ACTION_EFFECT),
    ];

    segments
        .iter()
        .filter(|(included, _)| *included)
        .map(|(_, segment)| *segment)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
