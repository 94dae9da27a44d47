//! Boundary value types shared by every layer.

pub mod character_sheet;

pub use character_sheet::{CharacterSheetValues, SheetValue};
