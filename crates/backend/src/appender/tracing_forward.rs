//! crates/backend/src/appender/tracing_forward.rs
//! Appender forwarding records as `tracing` events.

use std::io;

use super::Appender;
use crate::level::Level;
use crate::record::Record;

/// Target of the `tracing` events emitted by [`TracingAppender`].
///
/// Bridges that route `tracing` events back into the hierarchy must ignore
/// this target to avoid feedback loops.
pub const TRACING_TARGET: &str = "hierlog::record";

/// Appender forwarding records to the `tracing` ecosystem.
///
/// Each record becomes one event with target [`TRACING_TARGET`], the logger
/// name, source location and rendered message as fields. `FATAL` maps to
/// `ERROR` since `tracing` has no higher level.
#[derive(Debug)]
pub struct TracingAppender {
    name: String,
}

impl TracingAppender {
    /// Creates a forwarding appender.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

macro_rules! forward {
    ($level:expr, $record:expr) => {{
        let record = $record;
        let location = record.location();
        ::tracing::event!(
            target: TRACING_TARGET,
            $level,
            logger = record.logger(),
            file = location.file(),
            line = location.line(),
            module = location.module(),
            lwp = record.lwp(),
            "{}",
            record.message()
        );
    }};
}

impl Appender for TracingAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, record: &Record<'_>) -> io::Result<()> {
        match record.level() {
            Level::Trace => forward!(::tracing::Level::TRACE, record),
            Level::Debug => forward!(::tracing::Level::DEBUG, record),
            Level::Info => forward!(::tracing::Level::INFO, record),
            Level::Warn => forward!(::tracing::Level::WARN, record),
            Level::Error | Level::Fatal => forward!(::tracing::Level::ERROR, record),
        }
        Ok(())
    }
}
