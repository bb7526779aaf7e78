//! crates/backend/src/record.rs
//! A single log event as handed to appenders.

use std::collections::BTreeMap;

use crate::level::Level;
use crate::location::Location;
use crate::{mdc, thread};

/// Log event with everything a layout may render.
///
/// The record borrows the logger name, message and location from the
/// emitting call and owns a copy of the thread's diagnostic context.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    logger: &'a str,
    level: Level,
    message: &'a str,
    location: &'a Location,
    mdc: BTreeMap<String, String>,
    lwp: u32,
    thread_name: Option<String>,
}

impl<'a> Record<'a> {
    /// Captures a record on the calling thread.
    #[must_use]
    pub fn new(logger: &'a str, level: Level, message: &'a str, location: &'a Location) -> Self {
        Self {
            logger,
            level,
            message,
            location,
            mdc: mdc::snapshot(),
            lwp: thread::lwp_id(),
            thread_name: thread::thread_name(),
        }
    }

    /// Replaces the captured diagnostic context.
    #[must_use]
    pub fn with_mdc(mut self, mdc: BTreeMap<String, String>) -> Self {
        self.mdc = mdc;
        self
    }

    /// Name of the emitting logger, empty for the root logger.
    #[must_use]
    pub const fn logger(&self) -> &'a str {
        self.logger
    }

    /// Severity of the record.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Rendered message text.
    #[must_use]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// Call-site of the log statement.
    #[must_use]
    pub const fn location(&self) -> &'a Location {
        self.location
    }

    /// Diagnostic context of the emitting thread at emission time.
    #[must_use]
    pub const fn mdc(&self) -> &BTreeMap<String, String> {
        &self.mdc
    }

    /// Lightweight-process id of the emitting thread.
    #[must_use]
    pub const fn lwp(&self) -> u32 {
        self.lwp
    }

    /// Name of the emitting thread, if it has one.
    #[must_use]
    pub fn thread_name(&self) -> Option<&str> {
        self.thread_name.as_deref()
    }
}
