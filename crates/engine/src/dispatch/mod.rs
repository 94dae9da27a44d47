//! Change dispatch.
//!
//! Every write that changes a value becomes a [`ChangeEvent`]. The
//! [`ChangeDispatcher`] routes it to the [`SheetRule`]s whose triggers match,
//! synchronously and in registration order. Rules write back through a
//! [`SheetContext`], which may dispatch further events before returning.

mod context;
mod error;
mod event;
mod registry;
mod report;

pub use context::SheetContext;
pub use error::{DispatchError, RuleError};
pub use event::{ChangeEvent, ChangeKind, ChangeOrigin, Trigger};
pub use registry::{ChangeDispatcher, RegisteredRule, SheetRule};
pub use report::{Diagnostic, DispatchFailure, DispatchReport};
