//! Value objects for the sheet vocabulary.

mod attribute;
mod attribute_key;
mod section;

pub use attribute::{is_modifiable, modifiable_names, AttributeCategory, CoreAttribute, Defense};
pub use attribute_key::{AttributeKey, RowRef};
pub use section::Section;
