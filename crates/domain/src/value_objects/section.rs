//! Section value object - the repeating sections a character sheet carries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A repeating section of the sheet.
///
/// Known sections get their own variant; anything else is kept verbatim in
/// `Other` so records from newer sheet layouts still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Abilities,
    Actions,
    Attacks,
    Favorites,
    Features,
    Inventory,
    Modifiers,
    ReactiveActions,
    Reactions,
    Skills,
    Spells,
    Talents,
    Other(String),
}

impl Section {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Abilities => "abilities",
            Self::Actions => "actions",
            Self::Attacks => "attacks",
            Self::Favorites => "favorites",
            Self::Features => "features",
            Self::Inventory => "inventory",
            Self::Modifiers => "modifiers",
            Self::ReactiveActions => "reactive-actions",
            Self::Reactions => "reactions",
            Self::Skills => "skills",
            Self::Spells => "spells",
            Self::Talents => "talents",
            Self::Other(name) => name.as_str(),
        }
    }

    /// The `repeating_<section>` prefix shared by every field of the section.
    pub fn prefix(&self) -> String {
        format!("repeating_{}", self.as_str())
    }

    /// All sections the sheet defines.
    pub fn known() -> [Section; 12] {
        [
            Self::Abilities,
            Self::Actions,
            Self::Attacks,
            Self::Favorites,
            Self::Features,
            Self::Inventory,
            Self::Modifiers,
            Self::ReactiveActions,
            Self::Reactions,
            Self::Skills,
            Self::Spells,
            Self::Talents,
        ]
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.contains('_') {
            return Err(DomainError::parse(format!("Invalid section name: {s:?}")));
        }
        let section = Self::known()
            .into_iter()
            .find(|known| known.as_str() == s)
            .unwrap_or_else(|| Self::Other(s.to_string()));
        Ok(section)
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
