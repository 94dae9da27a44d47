//! Attribute abbreviations shown next to attacks and skills.

use mythcraft_domain::game_rules::{attribute_abbreviation, attribute_abbreviation_display, strip_reference};
use mythcraft_domain::Section;

use crate::dispatch::{ChangeEvent, RuleError, SheetContext, SheetRule, Trigger};

pub const ATTRIBUTE_FIELD: &str = "attribute";
pub const ABBREVIATION_FIELD: &str = "attribute_abbreviation";

pub struct AbbreviationRule;

impl SheetRule for AbbreviationRule {
    fn name(&self) -> &'static str {
        "attribute_abbreviation"
    }

    fn triggers(&self) -> Vec<Trigger> {
        vec![
            Trigger::section_field(Section::Attacks, ATTRIBUTE_FIELD),
            Trigger::section_field(Section::Skills, ATTRIBUTE_FIELD),
        ]
    }

    fn outputs(&self) -> Vec<Trigger> {
        vec![
            Trigger::section_field(Section::Attacks, ABBREVIATION_FIELD),
            Trigger::section_field(Section::Skills, ABBREVIATION_FIELD),
        ]
    }

    fn apply(&self, ctx: &mut SheetContext<'_>, event: &ChangeEvent) -> Result<(), RuleError> {
        let Some(row) = event.row() else {
            return Ok(());
        };

        let abbreviation = if strip_reference(&event.new_value).is_empty() {
            String::new()
        } else if row.section == Section::Skills {
            attribute_abbreviation_display(&event.new_value)
        } else {
            attribute_abbreviation(&event.new_value)
        };
        ctx.set(row.field(ABBREVIATION_FIELD), abbreviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::*;
    use std::sync::Arc;

    #[test]
    fn attacks_get_plain_codes_and_skills_get_display_text() {
        let mut sheet = sheet_with(vec![Arc::new(AbbreviationRule)], &[]);
        sheet.player_edit(&[
            ("repeating_attacks_-a1_attribute", "@{strength}"),
            ("repeating_skills_-k1_attribute", "awareness"),
        ]);

        assert_eq!(sheet.get("repeating_attacks_-a1_attribute_abbreviation"), "str");
        assert_eq!(sheet.get("repeating_skills_-k1_attribute_abbreviation"), "(awr)");
    }

    #[test]
    fn clearing_the_attribute_clears_the_code() {
        let mut sheet = sheet_with(
            vec![Arc::new(AbbreviationRule)],
            &[
                ("repeating_attacks_-a1_attribute", "luck"),
                ("repeating_attacks_-a1_attribute_abbreviation", "luck"),
            ],
        );
        sheet.player_edit(&[("repeating_attacks_-a1_attribute", "")]);
        assert_eq!(sheet.get("repeating_attacks_-a1_attribute_abbreviation"), "");
    }
}
