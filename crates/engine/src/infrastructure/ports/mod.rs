//! Port traits for infrastructure boundaries.
//!
//! The attribute store is the only abstraction the engine depends on. Rules,
//! migrations and the sheet facade are concrete types over it.

mod error;
mod store;

pub use error::StoreError;
pub use store::{AttributeChange, AttributeStore, AttributeUpdate, WriteOptions};

#[cfg(test)]
pub use store::MockAttributeStore;
