//! Attribute value object - the eight character attributes and the defenses
//! derived from them.
//!
//! Provides type safety for attribute references instead of magic strings
//! scattered through the rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute grouping used by the sheet layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    Mental,
    Metaphysic,
    Physical,
}

/// The eight character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreAttribute {
    Awareness,
    Intellect,
    Charisma,
    Luck,
    Coordination,
    Strength,
    Dexterity,
    Endurance,
}

impl CoreAttribute {
    /// Attribute name as stored on the sheet (e.g., "awareness").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Intellect => "intellect",
            Self::Charisma => "charisma",
            Self::Luck => "luck",
            Self::Coordination => "coordination",
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Endurance => "endurance",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Awareness => "Awareness",
            Self::Intellect => "Intellect",
            Self::Charisma => "Charisma",
            Self::Luck => "Luck",
            Self::Coordination => "Coordination",
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Endurance => "Endurance",
        }
    }

    pub fn category(&self) -> AttributeCategory {
        match self {
            Self::Awareness | Self::Intellect | Self::Charisma => AttributeCategory::Mental,
            Self::Luck | Self::Coordination => AttributeCategory::Metaphysic,
            Self::Strength | Self::Dexterity | Self::Endurance => AttributeCategory::Physical,
        }
    }

    /// All attributes in sheet order (mental, metaphysic, physical).
    pub fn all() -> [CoreAttribute; 8] {
        [
            Self::Awareness,
            Self::Intellect,
            Self::Charisma,
            Self::Luck,
            Self::Coordination,
            Self::Strength,
            Self::Dexterity,
            Self::Endurance,
        ]
    }
}

impl fmt::Display for CoreAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CoreAttribute {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|attr| attr.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Defense scores. Each is `base + modifier + attribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defense {
    Anticipation,
    Fortitude,
    Logic,
    Reflexes,
    Willpower,
}

impl Defense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anticipation => "anticipation",
            Self::Fortitude => "fortitude",
            Self::Logic => "logic",
            Self::Reflexes => "reflexes",
            Self::Willpower => "willpower",
        }
    }

    /// The attribute added to this defense.
    pub fn attribute(&self) -> CoreAttribute {
        match self {
            Self::Anticipation => CoreAttribute::Awareness,
            Self::Fortitude => CoreAttribute::Endurance,
            Self::Logic => CoreAttribute::Intellect,
            Self::Reflexes => CoreAttribute::Dexterity,
            Self::Willpower => CoreAttribute::Charisma,
        }
    }

    pub fn base_attr(&self) -> String {
        format!("{}_base", self.as_str())
    }

    pub fn modifier_attr(&self) -> String {
        format!("{}_modifier", self.as_str())
    }

    pub fn all() -> [Defense; 5] {
        [
            Self::Anticipation,
            Self::Fortitude,
            Self::Logic,
            Self::Reflexes,
            Self::Willpower,
        ]
    }
}

impl fmt::Display for Defense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-attribute, non-defense names a modifier row may target.
pub const OTHER_MODIFIABLE: [&str; 6] = [
    "action_points",
    "armor_rating",
    "critical_fail",
    "critical_hit",
    "hit_points",
    "initiative",
];

/// Every name a modifier row may target.
pub fn modifiable_names() -> Vec<&'static str> {
    CoreAttribute::all()
        .iter()
        .map(CoreAttribute::as_str)
        .chain(Defense::all().iter().map(Defense::as_str))
        .chain(OTHER_MODIFIABLE)
        .collect()
}

/// Whether a modifier row may target `name`.
pub fn is_modifiable(name: &str) -> bool {
    name.parse::<CoreAttribute>().is_ok()
        || Defense::all().iter().any(|d| d.as_str() == name)
        || OTHER_MODIFIABLE.contains(&name)
}
