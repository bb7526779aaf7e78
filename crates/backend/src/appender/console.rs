//! crates/backend/src/appender/console.rs
//! Appender writing to standard output or standard error.

use std::io::{self, Write};

use super::Appender;
use crate::layout::Layout;
use crate::record::Record;

/// Standard stream written by a [`ConsoleAppender`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output, the log4j default.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

impl ConsoleTarget {
    /// Parses the `Target` option (`System.out` / `System.err`).
    #[must_use]
    pub fn from_option(value: &str) -> Option<Self> {
        match value.trim() {
            "System.out" | "stdout" => Some(Self::Stdout),
            "System.err" | "stderr" => Some(Self::Stderr),
            _ => None,
        }
    }
}

/// Appender writing formatted records to stdout or stderr.
#[derive(Debug)]
pub struct ConsoleAppender {
    name: String,
    target: ConsoleTarget,
    layout: Layout,
}

impl ConsoleAppender {
    /// Creates a console appender.
    pub fn new(name: impl Into<String>, target: ConsoleTarget, layout: Layout) -> Self {
        Self {
            name: name.into(),
            target,
            layout,
        }
    }

    /// The stream this appender writes to.
    #[must_use]
    pub const fn target(&self) -> ConsoleTarget {
        self.target
    }

    /// The layout used to render records.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl Appender for ConsoleAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        let line = self.layout.format(record);
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            ConsoleTarget::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        }
    }
}
