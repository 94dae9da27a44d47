//! Short attribute codes shown next to attacks and skills.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Matches an `@{name}` attribute reference.
static ATTRIBUTE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@\{([^}]*)\}$").expect("valid regex"));

/// Codes that differ from the first three letters of the attribute.
const ABBREVIATION_TRANSLATIONS: [(&str, &str); 1] = [("awareness", "awr")];

/// Strip an optional `@{...}` wrapper.
pub fn strip_reference(value: &str) -> &str {
    let value = value.trim();
    ATTRIBUTE_REFERENCE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map_or(value, |m| m.as_str())
}

/// Abbreviation for an attribute name or `@{name}` reference.
pub fn attribute_abbreviation(value: &str) -> String {
    let name = strip_reference(value);
    if name == "luck" {
        return "luck".to_string();
    }
    if let Some((_, code)) = ABBREVIATION_TRANSLATIONS
        .iter()
        .find(|(attribute, _)| *attribute == name)
    {
        return (*code).to_string();
    }
    name.chars().take(3).collect()
}

/// Display form used by skills: `(awr)`.
pub fn attribute_abbreviation_display(value: &str) -> String {
    format!("({})", attribute_abbreviation(value))
}
