//! crates/backend/src/appender/mod.rs
//! Output targets attached to loggers.
//!
//! An [`Appender`] receives every record that reaches the logger it is
//! attached to, or any descendant of that logger while additivity allows the
//! record to travel upwards. Appenders own their [`Layout`](crate::Layout) and
//! perform their own synchronisation, so they can be shared between loggers
//! and threads.

mod console;
mod file;
mod memory;
#[cfg(unix)]
pub mod syslog;
mod tracing_forward;

use std::fmt;
use std::io;

use crate::record::Record;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use file::FileAppender;
pub use memory::MemoryAppender;
#[cfg(unix)]
pub use syslog::SyslogAppender;
pub use tracing_forward::{TRACING_TARGET, TracingAppender};

/// Destination for formatted records.
pub trait Appender: Send + Sync + fmt::Debug {
    /// Name the appender was configured under.
    fn name(&self) -> &str;

    /// Writes one record.
    ///
    /// Failures are returned to the hierarchy, which reports them and keeps
    /// dispatching to the remaining appenders.
    fn append(&self, record: &Record<'_>) -> io::Result<()>;
}
