//! End-to-end sheet tests.
//!
//! These tests drive a `CharacterSheet` wired with every built-in rule and
//! the standard migration chain, the way a host would:
//! - Player edits cascade through derivations
//! - Linked records stay in step across sections
//! - Opening legacy characters upgrades them exactly once
//! - Store failures are recorded without stopping other rules
//!
//! # Running
//!
//! ```bash
//! cargo test -p mythcraft-engine --lib e2e_tests
//! ```

mod e2e_helpers;

pub use e2e_helpers::*;
