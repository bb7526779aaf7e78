//! crates/backend/src/appender/memory.rs
//! Appender that buffers formatted lines for tests and inspection.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Appender;
use crate::layout::Layout;
use crate::record::Record;

/// Appender that keeps formatted lines in memory.
///
/// Clones share the same buffer, so a caller can attach one clone to a
/// logger and inspect the captured output through another.
#[derive(Clone, Debug)]
pub struct MemoryAppender {
    name: String,
    layout: Layout,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryAppender {
    /// Creates an empty in-memory appender.
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copies the captured lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Concatenates the captured lines.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lock().concat()
    }

    /// Removes and returns the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Appender for MemoryAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        let line = self.layout.format(record);
        self.lock().push(line);
        Ok(())
    }
}
