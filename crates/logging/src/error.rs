//! crates/logging/src/error.rs
//! Errors surfaced to callers of the context stack.

use thiserror::Error;

/// Misuse of the logger-name context stack.
///
/// Unlike configuration failures, which are reported and contained, these
/// indicate a programming defect at the call site and are always returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The pushed segment was empty or contained a `.`.
    #[error("invalid context name '{name}': must be non-empty and must not contain '.'")]
    InvalidName {
        /// Rejected segment.
        name: String,
    },
    /// A pop was attempted with nothing pushed.
    #[error("context stack is empty")]
    EmptyStack,
}
