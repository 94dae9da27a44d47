use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A stored attribute value, parsed once at the store boundary.
///
/// The store itself only holds strings. Rules read through this type so the
/// string/number coercion policy lives in one place: non-numeric input reads
/// as zero and never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SheetValue {
    Integer(i32),
    Float(f64),
    Flag(bool),
    Text(String),
    Empty,
}

impl SheetValue {
    /// Classify a raw stored string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return SheetValue::Empty;
        }
        match trimmed {
            "true" | "on" => return SheetValue::Flag(true),
            "false" | "off" => return SheetValue::Flag(false),
            _ => {}
        }
        if let Ok(value) = trimmed.strip_prefix('+').unwrap_or(trimmed).parse::<i32>() {
            return SheetValue::Integer(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => SheetValue::Float(value),
            _ => SheetValue::Text(raw.to_string()),
        }
    }

    /// Integer reading with leading-number semantics (`"3 AP"` reads as 3,
    /// `"2.7"` as 2). `None` when no number leads the value.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            SheetValue::Integer(value) => Some(*value),
            SheetValue::Float(value) => Some(value.trunc() as i32),
            SheetValue::Flag(_) | SheetValue::Empty => None,
            SheetValue::Text(value) => leading_integer(value),
        }
    }

    /// Integer reading where anything non-numeric counts as zero.
    pub fn int_or_zero(&self) -> i32 {
        self.as_i32().unwrap_or(0)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SheetValue::Integer(value) => Some(f64::from(*value)),
            SheetValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Checkbox reading: `"on"`/`"true"` or a non-zero number.
    pub fn is_set(&self) -> bool {
        match self {
            SheetValue::Flag(value) => *value,
            SheetValue::Integer(value) => *value != 0,
            SheetValue::Float(value) => *value != 0.0,
            SheetValue::Text(_) | SheetValue::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SheetValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SheetValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Format for storage.
    pub fn to_attr_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SheetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetValue::Integer(value) => write!(f, "{value}"),
            SheetValue::Float(value) => write!(f, "{value}"),
            SheetValue::Flag(value) => write!(f, "{value}"),
            SheetValue::Text(value) => write!(f, "{value}"),
            SheetValue::Empty => Ok(()),
        }
    }
}

impl From<i32> for SheetValue {
    fn from(value: i32) -> Self {
        SheetValue::Integer(value)
    }
}

impl From<f64> for SheetValue {
    fn from(value: f64) -> Self {
        SheetValue::Float(value)
    }
}

impl From<bool> for SheetValue {
    fn from(value: bool) -> Self {
        SheetValue::Flag(value)
    }
}

impl From<&str> for SheetValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            SheetValue::Empty
        } else {
            SheetValue::Text(value.to_string())
        }
    }
}

impl From<String> for SheetValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            SheetValue::Empty
        } else {
            SheetValue::Text(value)
        }
    }
}

fn leading_integer(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1i64, &trimmed[1..]),
        _ => (1i64, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    i32::try_from(sign * magnitude).ok()
}

/// A batch of attribute values read in one store call, parsed once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterSheetValues {
    pub values: BTreeMap<String, SheetValue>,
}

impl CharacterSheetValues {
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        Self {
            values: raw
                .iter()
                .map(|(key, value)| (key.clone(), SheetValue::parse(value)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SheetValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: SheetValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Numeric value of `key`, zero when missing or non-numeric.
    pub fn int(&self, key: &str) -> i32 {
        self.get(key).map(SheetValue::int_or_zero).unwrap_or(0)
    }

    /// Numeric value of `key`, `None` when missing or non-numeric.
    pub fn opt_int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(SheetValue::as_i32)
    }

    /// Stored text of `key` (numbers and flags are formatted back).
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(SheetValue::to_attr_string).unwrap_or_default()
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(SheetValue::is_set).unwrap_or(false)
    }

    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map(SheetValue::is_empty).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_classifies_values() {
        assert_eq!(SheetValue::parse(""), SheetValue::Empty);
        assert_eq!(SheetValue::parse("  "), SheetValue::Empty);
        assert_eq!(SheetValue::parse("on"), SheetValue::Flag(true));
        assert_eq!(SheetValue::parse("false"), SheetValue::Flag(false));
        assert_eq!(SheetValue::parse("+2"), SheetValue::Integer(2));
        assert_eq!(SheetValue::parse("-3"), SheetValue::Integer(-3));
        assert_eq!(SheetValue::parse("1.21"), SheetValue::Float(1.21));
        assert_eq!(
            SheetValue::parse(">19"),
            SheetValue::Text(">19".to_string())
        );
    }

    #[test]
    fn non_numeric_reads_as_zero() {
        assert_eq!(SheetValue::parse("abc").int_or_zero(), 0);
        assert_eq!(SheetValue::Empty.int_or_zero(), 0);
        assert_eq!(SheetValue::parse("3 AP").int_or_zero(), 3);
        assert_eq!(SheetValue::parse("2.7").int_or_zero(), 2);
        assert_eq!(SheetValue::parse("-").as_i32(), None);
    }

    #[test]
    fn formats_for_storage() {
        assert_eq!(SheetValue::from(3).to_attr_string(), "3");
        assert_eq!(SheetValue::from(1.3).to_attr_string(), "1.3");
        assert_eq!(SheetValue::from(1.0).to_attr_string(), "1");
        assert_eq!(SheetValue::from(false).to_attr_string(), "false");
        assert_eq!(SheetValue::Empty.to_attr_string(), "");
    }

    #[test]
    fn sheet_values_typed_reads() {
        let mut raw = HashMap::new();
        raw.insert("luck".to_string(), "7".to_string());
        raw.insert("toggle_active".to_string(), "on".to_string());
        raw.insert("name".to_string(), "Fireball".to_string());
        raw.insert("blank".to_string(), String::new());
        let values = CharacterSheetValues::from_raw(&raw);

        assert_eq!(values.int("luck"), 7);
        assert_eq!(values.int("missing"), 0);
        assert!(values.flag("toggle_active"));
        assert_eq!(values.text("name"), "Fireball");
        assert!(values.is_blank("blank"));
        assert!(values.is_blank("missing"));
        assert!(!values.is_blank("name"));
    }

    #[test]
    fn serde_uses_tagged_layout() {
        let json = serde_json::to_string(&SheetValue::Integer(4)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":4}"#);
    }
}
