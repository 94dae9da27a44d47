//! Mythcraft sheet vocabulary and derivation formulas.
//!
//! This crate is I/O free. It names things (attributes, sections, records,
//! attribute keys), parses stored values, and computes derived values. The
//! reactive runtime lives in `mythcraft-engine`.

pub mod error;
pub mod game_rules;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use error::DomainError;
pub use ids::RowId;
pub use types::{CharacterSheetValues, SheetValue};
pub use value_objects::{
    is_modifiable, modifiable_names, AttributeCategory, AttributeKey, CoreAttribute, Defense,
    RowRef, Section,
};
