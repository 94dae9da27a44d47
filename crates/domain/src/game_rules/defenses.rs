//! Defense scores and initiative.

use crate::types::CharacterSheetValues;
use crate::value_objects::{CoreAttribute, Defense};

/// `<defense>_base + <defense>_modifier + <linked attribute>`.
pub fn defense_total(defense: Defense, values: &CharacterSheetValues) -> i32 {
    values
        .int(&defense.base_attr())
        .saturating_add(values.int(&defense.modifier_attr()))
        .saturating_add(values.int(defense.attribute().as_str()))
}

/// `initiative_bonus + awareness`.
pub fn initiative_total(values: &CharacterSheetValues) -> i32 {
    values
        .int("initiative_bonus")
        .saturating_add(values.int(CoreAttribute::Awareness.as_str()))
}

/// Every attribute a defense total reads.
pub fn defense_inputs(defense: Defense) -> [String; 3] {
    [
        defense.base_attr(),
        defense.modifier_attr(),
        defense.attribute().as_str().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn values(pairs: &[(&str, &str)]) -> CharacterSheetValues {
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CharacterSheetValues::from_raw(&raw)
    }

    #[test]
    fn defense_sums_base_modifier_and_attribute() {
        let sheet = values(&[
            ("reflexes_base", "10"),
            ("reflexes_modifier", "1"),
            ("dexterity", "2"),
        ]);
        assert_eq!(defense_total(Defense::Reflexes, &sheet), 13);
        assert_eq!(defense_total(Defense::Logic, &sheet), 0);
    }

    #[test]
    fn extreme_values_saturate() {
        let sheet = values(&[
            ("fortitude_base", "2147483647"),
            ("fortitude_modifier", "3"),
            ("initiative_bonus", "-2147483648"),
            ("awareness", "-1"),
        ]);
        assert_eq!(defense_total(Defense::Fortitude, &sheet), i32::MAX);
        assert_eq!(initiative_total(&sheet), i32::MIN);
    }

    #[test]
    fn initiative_adds_awareness() {
        let sheet = values(&[("initiative_bonus", "2"), ("awareness", "-1")]);
        assert_eq!(initiative_total(&sheet), 1);
    }

    #[test]
    fn inputs_name_the_linked_attribute() {
        let inputs = defense_inputs(Defense::Willpower);
        assert_eq!(inputs[2], "charisma");
    }
}
