//! Change events and the trigger patterns rules subscribe with.

use std::collections::BTreeMap;
use std::fmt;

use mythcraft_domain::{AttributeKey, RowRef, Section};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::AttributeChange;

/// Who caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    /// A person editing the sheet.
    Player,
    /// A rule or an import adapter.
    Worker,
    /// A version migration step.
    Migration,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Worker => write!(f, "worker"),
            Self::Migration => write!(f, "migration"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeKind {
    Updated,
    /// A whole record was deleted. `removed` holds its former fields.
    RowRemoved { removed: BTreeMap<String, String> },
}

/// A single change delivered to the rules subscribed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Full attribute name, or the record prefix for removals.
    pub source_attribute: String,
    pub previous_value: String,
    pub new_value: String,
    pub origin: ChangeOrigin,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn updated(change: &AttributeChange, origin: ChangeOrigin) -> Self {
        Self {
            source_attribute: change.name.clone(),
            previous_value: change.previous.clone(),
            new_value: change.new.clone(),
            origin,
            kind: ChangeKind::Updated,
        }
    }

    pub fn row_removed(
        row: &RowRef,
        removed: impl IntoIterator<Item = (String, String)>,
        origin: ChangeOrigin,
    ) -> Self {
        Self {
            source_attribute: row.prefix(),
            previous_value: String::new(),
            new_value: String::new(),
            origin,
            kind: ChangeKind::RowRemoved {
                removed: removed.into_iter().collect(),
            },
        }
    }

    /// The parsed attribute key of an update. `None` for removals.
    pub fn key(&self) -> Option<AttributeKey> {
        match self.kind {
            ChangeKind::Updated => AttributeKey::parse(&self.source_attribute).ok(),
            ChangeKind::RowRemoved { .. } => None,
        }
    }

    /// The record the event concerns, for row field updates and removals.
    pub fn row(&self) -> Option<RowRef> {
        match self.kind {
            ChangeKind::Updated => self.key().and_then(|key| key.row().cloned()),
            ChangeKind::RowRemoved { .. } => self.source_attribute.parse().ok(),
        }
    }

    /// The field name of a row field update.
    pub fn field(&self) -> Option<String> {
        self.key().and_then(|key| key.field().map(str::to_string))
    }

    /// A field of the removed record; `""` when absent or not a removal.
    pub fn removed_field(&self, field: &str) -> &str {
        match &self.kind {
            ChangeKind::RowRemoved { removed } => removed
                .get(&format!("{}_{}", self.source_attribute, field))
                .map(String::as_str)
                .unwrap_or(""),
            ChangeKind::Updated => "",
        }
    }

    pub fn is_row_removal(&self) -> bool {
        matches!(self.kind, ChangeKind::RowRemoved { .. })
    }
}

/// Which changes a rule reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// An exact scalar attribute.
    Attribute(String),
    /// Any field of any record in a section.
    Section(Section),
    /// One field of any record in a section (`repeating_<section>:<field>`).
    SectionField(Section, String),
    /// A record of the section was deleted.
    RowRemoved(Section),
}

impl Trigger {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    pub fn section_field(section: Section, field: impl Into<String>) -> Self {
        Self::SectionField(section, field.into())
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (&event.kind, self) {
            (ChangeKind::RowRemoved { .. }, Trigger::RowRemoved(section)) => event
                .row()
                .is_some_and(|row| &row.section == section),
            (ChangeKind::RowRemoved { .. }, _) | (ChangeKind::Updated, Trigger::RowRemoved(_)) => {
                false
            }
            (ChangeKind::Updated, _) => self.matches_attribute(&event.source_attribute),
        }
    }

    /// Whether an update of `name` would fire this trigger.
    pub fn matches_attribute(&self, name: &str) -> bool {
        let Ok(key) = AttributeKey::parse(name) else {
            return false;
        };
        match (self, key) {
            (Trigger::Attribute(expected), AttributeKey::Scalar(actual)) => *expected == actual,
            (Trigger::Section(section), AttributeKey::RowField { row, .. }) => row.section == *section,
            (Trigger::SectionField(section, expected), AttributeKey::RowField { row, field }) => {
                row.section == *section && *expected == field
            }
            _ => false,
        }
    }

    /// Whether some change could fire both patterns.
    pub fn overlaps(&self, other: &Trigger) -> bool {
        match (self, other) {
            (Trigger::Attribute(a), Trigger::Attribute(b)) => a == b,
            (Trigger::Section(a), Trigger::Section(b))
            | (Trigger::Section(a), Trigger::SectionField(b, _))
            | (Trigger::SectionField(a, _), Trigger::Section(b))
            | (Trigger::RowRemoved(a), Trigger::RowRemoved(b)) => a == b,
            (Trigger::SectionField(a, f), Trigger::SectionField(b, g)) => a == b && f == g,
            _ => false,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(name) => write!(f, "{name}"),
            Self::Section(section) => write!(f, "{}", section.prefix()),
            Self::SectionField(section, field) => write!(f, "{}:{field}", section.prefix()),
            Self::RowRemoved(section) => write!(f, "remove:{}", section.prefix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(name: &str) -> ChangeEvent {
        ChangeEvent::updated(&AttributeChange::new(name, "", "1"), ChangeOrigin::Player)
    }

    #[test]
    fn scalar_triggers_match_exact_names() {
        let trigger = Trigger::attribute("luck");
        assert!(trigger.matches(&update("luck")));
        assert!(!trigger.matches(&update("luck_points")));
        assert!(!trigger.matches(&update("repeating_skills_-a_luck")));
    }

    #[test]
    fn section_triggers_match_row_fields() {
        let any = Trigger::Section(Section::Attacks);
        let one = Trigger::section_field(Section::Attacks, "attribute");
        assert!(any.matches(&update("repeating_attacks_-a1_name")));
        assert!(!one.matches(&update("repeating_attacks_-a1_name")));
        assert!(one.matches(&update("repeating_attacks_-a1_attribute")));
        assert!(!one.matches(&update("repeating_attacks_-a1_attribute_abbreviation")));
        assert!(!any.matches(&update("repeating_spells_-a1_name")));
    }

    #[test]
    fn removal_triggers_only_match_removals() {
        let row: RowRef = "repeating_modifiers_-m1".parse().unwrap();
        let removal = ChangeEvent::row_removed(
            &row,
            [("repeating_modifiers_-m1_attribute".to_string(), "luck".to_string())],
            ChangeOrigin::Player,
        );
        assert!(Trigger::RowRemoved(Section::Modifiers).matches(&removal));
        assert!(!Trigger::Section(Section::Modifiers).matches(&removal));
        assert!(!Trigger::RowRemoved(Section::Modifiers).matches(&update("repeating_modifiers_-m1_modifier")));
        assert_eq!(removal.removed_field("attribute"), "luck");
        assert_eq!(removal.row(), Some(row));
    }

    #[test]
    fn overlap_detection() {
        let section = Trigger::Section(Section::Spells);
        let field = Trigger::section_field(Section::Spells, "roll_formula");
        assert!(section.overlaps(&field));
        assert!(field.overlaps(&section));
        assert!(!field.overlaps(&Trigger::section_field(Section::Spells, "damage")));
        assert!(!Trigger::attribute("luck").overlaps(&Trigger::attribute("luck_points")));
    }

    #[test]
    fn event_exposes_row_and_field() {
        let event = update("repeating_spells_-s1_damage");
        assert_eq!(event.field().as_deref(), Some("damage"));
        assert_eq!(event.row().map(|r| r.section), Some(Section::Spells));
        assert!(update("luck").row().is_none());
    }
}
