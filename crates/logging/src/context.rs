//! crates/logging/src/context.rs
//! Logger-name context stack.
//!
//! The stack composes the name of the current default logger: pushing `a`
//! then `b` makes `a.b` the default. It belongs to a [`LogSystem`] and is
//! shared by every thread using it. The internal lock keeps the segment
//! vector consistent but does not scope nesting per thread, so concurrent
//! push/pop sequences from several threads produce unspecified names.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ContextError;
use crate::system::LogSystem;

#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    segments: Mutex<Vec<String>>,
}

impl ContextStack {
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.segments.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn push(&self, name: &str) -> Result<(), ContextError> {
        validate_segment(name)?;
        self.lock().push(name.to_owned());
        Ok(())
    }

    pub(crate) fn pop(&self) -> Result<String, ContextError> {
        self.lock().pop().ok_or(ContextError::EmptyStack)
    }

    pub(crate) fn joined(&self) -> String {
        self.lock().join(".")
    }

    pub(crate) fn depth(&self) -> usize {
        self.lock().len()
    }
}

fn validate_segment(name: &str) -> Result<(), ContextError> {
    if name.is_empty() || name.contains('.') {
        return Err(ContextError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

/// Scope guard that pushes a context segment and pops it on drop.
///
/// ```
/// use hierlog::{LogSystem, Hierarchy};
/// use std::sync::Arc;
///
/// let system = LogSystem::new(Arc::new(Hierarchy::new()));
/// {
///     let _outer = system.context("main").unwrap();
///     let _inner = system.context("task").unwrap();
///     assert_eq!(system.default_name(), "main.task");
/// }
/// assert_eq!(system.default_name(), "");
/// ```
#[derive(Debug)]
#[must_use = "the context is popped as soon as the guard is dropped"]
pub struct LogContext {
    system: Arc<LogSystem>,
    name: String,
}

impl LogContext {
    /// Pushes `name` onto the process-wide system's context stack.
    pub fn new(name: &str) -> Result<Self, ContextError> {
        LogSystem::global().context(name)
    }

    pub(crate) fn push(system: Arc<LogSystem>, name: &str) -> Result<Self, ContextError> {
        system.push_context(name)?;
        Ok(Self {
            system,
            name: name.to_owned(),
        })
    }

    /// The segment this guard pushed.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        if let Err(error) = self.system.pop_context() {
            tracing::warn!(
                target: "hierlog::context",
                segment = %self.name,
                %error,
                "context guard found the stack already empty"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_compose_name() {
        let stack = ContextStack::default();
        assert_eq!(stack.joined(), "");
        stack.push("main").unwrap();
        stack.push("task").unwrap();
        assert_eq!(stack.joined(), "main.task");
        assert_eq!(stack.pop().unwrap(), "task");
        assert_eq!(stack.joined(), "main");
    }

    #[test]
    fn invalid_names_leave_stack_unchanged() {
        let stack = ContextStack::default();
        stack.push("ok").unwrap();
        assert_eq!(
            stack.push(""),
            Err(ContextError::InvalidName {
                name: String::new()
            })
        );
        assert!(matches!(
            stack.push("a.b"),
            Err(ContextError::InvalidName { .. })
        ));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.joined(), "ok");
    }

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let stack = ContextStack::default();
        assert_eq!(stack.pop(), Err(ContextError::EmptyStack));
    }
}
