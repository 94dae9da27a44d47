//! Attribute keys - scalar names and `repeating_<section>_<rowid>_<field>` names.
//!
//! Records and links are modelled as [`RowRef`] values instead of being
//! spliced together with string concatenation at every call site.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::DomainError;
use crate::ids::RowId;
use crate::value_objects::Section;

static ROW_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^repeating_([^_]+)_([^_]+)_(.+)$").expect("valid regex"));

static ROW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^repeating_([^_]+)_([^_]+)$").expect("valid regex"));

/// Reference to one record of a repeating section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowRef {
    pub section: Section,
    pub row_id: RowId,
}

impl RowRef {
    pub fn new(section: Section, row_id: RowId) -> Self {
        Self { section, row_id }
    }

    /// `repeating_<section>_<rowid>`; also the value stored in `_link` fields.
    pub fn prefix(&self) -> String {
        format!("{}_{}", self.section.prefix(), self.row_id)
    }

    /// Full attribute name of one of this record's fields.
    pub fn field(&self, name: &str) -> String {
        format!("{}_{}", self.prefix(), name)
    }

    /// Parse a `_link` value. Blank or malformed links mean "no linked record".
    pub fn from_link(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        value.parse().ok()
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for RowRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ROW_PREFIX
            .captures(s)
            .ok_or_else(|| DomainError::invalid_attribute_key(s))?;
        Ok(Self {
            section: caps[1].parse()?,
            row_id: RowId::parse(&caps[2])?,
        })
    }
}

/// A parsed attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Scalar(String),
    RowField { row: RowRef, field: String },
}

impl AttributeKey {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        if !name.starts_with("repeating_") {
            if name.is_empty() {
                return Err(DomainError::invalid_attribute_key(name));
            }
            return Ok(Self::Scalar(name.to_string()));
        }
        let caps = ROW_FIELD
            .captures(name)
            .ok_or_else(|| DomainError::invalid_attribute_key(name))?;
        Ok(Self::RowField {
            row: RowRef::new(caps[1].parse()?, RowId::parse(&caps[2])?),
            field: caps[3].to_string(),
        })
    }

    pub fn row(&self) -> Option<&RowRef> {
        match self {
            Self::RowField { row, .. } => Some(row),
            Self::Scalar(_) => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RowField { field, .. } => Some(field.as_str()),
            Self::Scalar(_) => None,
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => write!(f, "{name}"),
            Self::RowField { row, field } => write!(f, "{}", row.field(field)),
        }
    }
}
