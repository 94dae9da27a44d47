//! In-memory attribute store.
//!
//! Holds the whole character in a `BTreeMap`. Used by the host binary (which
//! loads and saves it as JSON) and by tests.

use std::collections::{BTreeMap, HashMap};

use mythcraft_domain::{AttributeKey, RowId, RowRef, Section};
use serde::{Deserialize, Serialize};

use super::ports::{AttributeChange, AttributeStore, AttributeUpdate, StoreError, WriteOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct InMemoryAttributeStore {
    values: BTreeMap<String, String>,
    /// Known records in creation order. Rows without any field yet still
    /// belong to their section.
    rows: Vec<RowRef>,
}

impl InMemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a flat attribute map, discovering records from
    /// `repeating_<section>_<rowid>_<field>` names.
    pub fn from_attributes<I, K, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = Self::new();
        for (name, value) in attributes {
            let name = name.into();
            let value = value.into();
            store.track_row(&name);
            if !value.is_empty() {
                store.values.insert(name, value);
            }
        }
        store
    }

    /// Parse a JSON object of attribute names to values.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(StoreError::serialization)
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.values).map_err(StoreError::serialization)
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn track_row(&mut self, name: &str) {
        if let Ok(AttributeKey::RowField { row, .. }) = AttributeKey::parse(name) {
            if !self.rows.contains(&row) {
                self.rows.push(row);
            }
        }
    }
}

impl From<BTreeMap<String, String>> for InMemoryAttributeStore {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self::from_attributes(values)
    }
}

impl From<InMemoryAttributeStore> for BTreeMap<String, String> {
    fn from(store: InMemoryAttributeStore) -> Self {
        store.values
    }
}

impl AttributeStore for InMemoryAttributeStore {
    fn get_attrs(&self, names: &[String]) -> Result<HashMap<String, String>, StoreError> {
        Ok(names
            .iter()
            .map(|name| (name.clone(), self.get(name).to_string()))
            .collect())
    }

    fn set_attrs(
        &mut self,
        update: &AttributeUpdate,
        _options: WriteOptions,
    ) -> Result<Vec<AttributeChange>, StoreError> {
        let mut changes = Vec::new();
        for (name, value) in update {
            let previous = self.get(name).to_string();
            if previous == *value {
                continue;
            }
            self.track_row(name);
            if value.is_empty() {
                self.values.remove(name);
            } else {
                self.values.insert(name.clone(), value.clone());
            }
            changes.push(AttributeChange::new(name.clone(), previous, value.clone()));
        }
        Ok(changes)
    }

    fn section_row_ids(&self, section: &Section) -> Result<Vec<RowId>, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| &row.section == section)
            .map(|row| row.row_id.clone())
            .collect())
    }

    fn create_row(&mut self, section: &Section) -> Result<RowRef, StoreError> {
        let row = RowRef::new(section.clone(), RowId::new());
        self.rows.push(row.clone());
        Ok(row)
    }

    fn remove_row(&mut self, row: &RowRef) -> Result<HashMap<String, String>, StoreError> {
        let field_prefix = format!("{}_", row.prefix());
        let names: Vec<String> = self
            .values
            .range(field_prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&field_prefix))
            .map(|(name, _)| name.clone())
            .collect();

        let mut removed = HashMap::new();
        for name in names {
            if let Some(value) = self.values.remove(&name) {
                removed.insert(name, value);
            }
        }
        self.rows.retain(|known| known != row);
        Ok(removed)
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(pairs: &[(&str, &str)]) -> AttributeUpdate {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_attributes_read_as_empty() {
        let store = InMemoryAttributeStore::from_attributes([("luck", "3")]);
        let values = store
            .get_attrs(&["luck".to_string(), "level".to_string()])
            .unwrap();
        assert_eq!(values["luck"], "3");
        assert_eq!(values["level"], "");
    }

    #[test]
    fn set_reports_only_changed_entries() {
        let mut store = InMemoryAttributeStore::from_attributes([("luck", "3")]);
        let changes = store
            .set_attrs(
                &update(&[("luck", "3"), ("level", "2")]),
                WriteOptions::notify(),
            )
            .unwrap();
        assert_eq!(changes, vec![AttributeChange::new("level", "", "2")]);
    }

    #[test]
    fn clearing_a_value_removes_it() {
        let mut store = InMemoryAttributeStore::from_attributes([("critical_range", "20")]);
        let changes = store
            .set_attrs(&update(&[("critical_range", "")]), WriteOptions::silent())
            .unwrap();
        assert_eq!(changes.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn rows_are_discovered_and_created() {
        let mut store = InMemoryAttributeStore::from_attributes([
            ("repeating_spells_-a1_name", "Fireball"),
            ("repeating_spells_-a1_damage", "2d6"),
            ("repeating_attacks_-b2_name", "Sword"),
        ]);
        let spells = store.section_row_ids(&Section::Spells).unwrap();
        assert_eq!(spells.len(), 1);
        assert_eq!(spells[0].as_str(), "-a1");

        let created = store.create_row(&Section::Spells).unwrap();
        let spells = store.section_row_ids(&Section::Spells).unwrap();
        assert_eq!(spells.len(), 2);
        assert_eq!(spells[1], created.row_id);
    }

    #[test]
    fn remove_row_returns_removed_fields() {
        let mut store = InMemoryAttributeStore::from_attributes([
            ("repeating_modifiers_-m1_attribute", "strength"),
            ("repeating_modifiers_-m1_modifier", "2"),
            ("repeating_modifiers_-m10_modifier", "5"),
        ]);
        let row: RowRef = "repeating_modifiers_-m1".parse().unwrap();
        let removed = store.remove_row(&row).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed["repeating_modifiers_-m1_attribute"], "strength");
        assert_eq!(store.get("repeating_modifiers_-m10_modifier"), "5");
        assert_eq!(store.section_row_ids(&Section::Modifiers).unwrap().len(), 1);
    }

    #[test]
    fn json_round_trip_keeps_attributes() {
        let store = InMemoryAttributeStore::from_json(r#"{"version":"1.3","luck":"2"}"#).unwrap();
        assert_eq!(store.get("version"), "1.3");
        let json = store.to_json_pretty().unwrap();
        assert!(json.contains("\"luck\": \"2\""));
    }
}
