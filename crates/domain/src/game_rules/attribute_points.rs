//! Attribute point budget and level cap.
//!
//! At character creation a character starts with 5 attribute points.
//! Positive values cost that many points; negative values grant points
//! (each -1 gives +1 point).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::types::SheetValue;
use crate::value_objects::CoreAttribute;

/// Points every character starts with.
pub const BASE_ATTRIBUTE_POOL: i32 = 5;
/// Highest value the +/- controls allow.
pub const ATTRIBUTE_MAX: i32 = 2;
/// Lowest value any attribute may take.
pub const ATTRIBUTE_MIN: i32 = -3;

/// Clamp an attribute value into `[ATTRIBUTE_MIN, ATTRIBUTE_MAX]`.
pub fn value_check(value: i32) -> i32 {
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

/// [`value_check`] over a stored value; non-numeric reads as 0.
pub fn value_check_stored(value: &SheetValue) -> i32 {
    value.as_i32().map(value_check).unwrap_or(0)
}

/// Highest attribute value allowed at `level`: `ceil(level / 2) + 1`.
pub fn attribute_cap(level: i32) -> Result<i32, DomainError> {
    if level < 1 {
        return Err(DomainError::invalid_level(level));
    }
    Ok(level / 2 + level % 2 + 1)
}

/// One value per core attribute. Missing attributes count as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScores {
    values: BTreeMap<CoreAttribute, i32>,
}

impl AttributeScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: CoreAttribute, value: i32) -> Self {
        self.values.insert(attribute, value);
        self
    }

    pub fn set(&mut self, attribute: CoreAttribute, value: i32) {
        self.values.insert(attribute, value);
    }

    pub fn get(&self, attribute: CoreAttribute) -> i32 {
        self.values.get(&attribute).copied().unwrap_or(0)
    }

    /// All eight attributes in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (CoreAttribute, i32)> + '_ {
        CoreAttribute::all()
            .into_iter()
            .map(move |attr| (attr, self.get(attr)))
    }
}

/// How the attribute point pool is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePointUsage {
    pub spent: i32,
    pub gained_from_negatives: i32,
    pub total_pool: i32,
    pub remaining: i32,
}

pub fn compute_attribute_point_usage(scores: &AttributeScores) -> AttributePointUsage {
    let mut spent = 0;
    let mut gained_from_negatives = 0;

    for (_, value) in scores.iter() {
        if value > 0 {
            spent += value;
        } else if value < 0 {
            gained_from_negatives += -value;
        }
    }

    let total_pool = BASE_ATTRIBUTE_POOL + gained_from_negatives;
    AttributePointUsage {
        spent,
        gained_from_negatives,
        total_pool,
        remaining: total_pool - spent,
    }
}

/// Outcome of checking an attribute assignment against the cap and pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValidation {
    pub ok: bool,
    pub errors: Vec<String>,
    pub cap: i32,
    pub points: AttributePointUsage,
}

/// Validate an assignment. Every violation is collected.
pub fn validate_attributes(
    level: i32,
    scores: &AttributeScores,
) -> Result<AttributeValidation, DomainError> {
    let cap = attribute_cap(level)?;
    let points = compute_attribute_point_usage(scores);
    let mut errors = Vec::new();

    for (attribute, value) in scores.iter() {
        if value > cap {
            errors.push(format!(
                "{attribute} ({value}) exceeds the cap of +{cap} for level {level}."
            ));
        }
    }

    if points.remaining < 0 {
        errors.push(format!(
            "You have overspent Attribute Points: spent {} with a pool of {}.",
            points.spent, points.total_pool
        ));
    }

    Ok(AttributeValidation {
        ok: errors.is_empty(),
        errors,
        cap,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_follows_level() {
        assert_eq!(attribute_cap(1), Ok(2));
        assert_eq!(attribute_cap(2), Ok(2));
        assert_eq!(attribute_cap(3), Ok(3));
        assert_eq!(attribute_cap(4), Ok(3));
        assert_eq!(attribute_cap(5), Ok(4));
        assert_eq!(attribute_cap(10), Ok(6));
        assert_eq!(attribute_cap(i32::MAX), Ok(1_073_741_825));
    }

    #[test]
    fn cap_rejects_levels_below_one() {
        assert_eq!(attribute_cap(0), Err(DomainError::InvalidLevel(0)));
        assert!(attribute_cap(-2).is_err());
    }

    #[test]
    fn value_check_clamps() {
        assert_eq!(value_check(3), 2);
        assert_eq!(value_check(-5), -3);
        assert_eq!(value_check(1), 1);
        assert_eq!(value_check_stored(&SheetValue::parse("abc")), 0);
        assert_eq!(value_check_stored(&SheetValue::parse("7")), 2);
    }

    #[test]
    fn usage_counts_negatives_as_gains() {
        let scores = AttributeScores::new()
            .with(CoreAttribute::Strength, 2)
            .with(CoreAttribute::Dexterity, 2)
            .with(CoreAttribute::Luck, -3)
            .with(CoreAttribute::Charisma, -1);
        let usage = compute_attribute_point_usage(&scores);
        assert_eq!(usage.spent, 4);
        assert_eq!(usage.gained_from_negatives, 4);
        assert_eq!(usage.total_pool, 9);
        assert_eq!(usage.remaining, 5);
    }

    #[test]
    fn validation_collects_every_violation() {
        let scores = AttributeScores::new()
            .with(CoreAttribute::Strength, 3)
            .with(CoreAttribute::Dexterity, 3);
        let result = validate_attributes(1, &scores).unwrap();
        assert!(!result.ok);
        assert_eq!(result.cap, 2);
        assert_eq!(result.points.remaining, -1);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].contains("strength (3) exceeds the cap of +2"));
        assert!(result.errors[2].contains("spent 6 with a pool of 5"));
    }

    #[test]
    fn validation_passes_within_budget() {
        let scores = AttributeScores::new()
            .with(CoreAttribute::Awareness, 2)
            .with(CoreAttribute::Intellect, 2)
            .with(CoreAttribute::Luck, 1);
        let result = validate_attributes(1, &scores).unwrap();
        assert!(result.ok);
        assert_eq!(result.points.remaining, 0);
    }

    #[test]
    fn ok_iff_no_overspend_and_no_cap_breach() {
        for level in 1..=6 {
            for a in ATTRIBUTE_MIN..=ATTRIBUTE_MAX {
                for b in ATTRIBUTE_MIN..=ATTRIBUTE_MAX {
                    for c in ATTRIBUTE_MIN..=ATTRIBUTE_MAX {
                        let scores = AttributeScores::new()
                            .with(CoreAttribute::Strength, a)
                            .with(CoreAttribute::Luck, b)
                            .with(CoreAttribute::Endurance, c);
                        let result = validate_attributes(level, &scores).unwrap();
                        let positives: i32 = [a, b, c].iter().filter(|v| **v > 0).sum();
                        let negatives: i32 = [a, b, c].iter().filter(|v| **v < 0).map(|v| -v).sum();
                        let remaining = BASE_ATTRIBUTE_POOL + negatives - positives;
                        let cap = attribute_cap(level).unwrap();
                        let breach = [a, b, c].iter().any(|v| *v > cap);
                        assert_eq!(result.points.remaining, remaining);
                        assert_eq!(result.ok, remaining >= 0 && !breach);
                    }
                }
            }
        }
    }
}
