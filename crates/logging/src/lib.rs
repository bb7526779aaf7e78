#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `hierlog` is a process-wide logging façade with leveled, hierarchical
//! loggers. Logger names are dotted paths (`app.db.pool`); levels and
//! appenders configured on a prefix apply to every logger below it. The
//! façade adds three things on top of the backend that stores the
//! hierarchy:
//!
//! - lazy, one-time default configuration on first use,
//! - a context stack that composes the name of the current default logger,
//! - per-thread hooks that populate the diagnostic context before a thread's
//!   first record.
//!
//! # Design
//!
//! All state lives in a [`LogSystem`]. The free functions and macros of this
//! crate operate on the process-wide system ([`LogSystem::global`]), which is
//! backed by the built-in [`Hierarchy`]. Independent systems can be created
//! over any [`Backend`] for tests or embedding.
//!
//! Default configuration reads the file named by `HIERLOG_CONFIG` (XML when
//! the name ends in `.xml`, property text otherwise). Without it, a console
//! appender with the pattern `%c %p: %m%n` is attached to the root logger at
//! `INFO`. Explicit configuration through [`configure`], [`configure_file`]
//! or [`configure_properties`] resets the backend first and always wins.
//!
//! # Invariants
//!
//! - The default configuration runs at most once per system and never after
//!   an explicit configuration.
//! - MDC init functions registered before a thread's first record run on
//!   that thread exactly once before the record is emitted.
//! - Messages formatted by [`log!`] and [`Logger::log`] never exceed
//!   [`MAX_LOG_MSG_LEN`] bytes.
//!
//! # Errors
//!
//! Configuration problems never abort logging. They are printed on standard
//! error, logged as `tracing` warnings under `hierlog::config`, and returned
//! as [`ConfigError`] from the explicit configuration functions. Misuse of
//! the context stack is reported through [`ContextError`].
//!
//! # Examples
//!
//! ```
//! use hierlog::{LogContext, get_logger, log_info, logs_debug};
//!
//! hierlog::configure_properties(
//!     "log4j.rootLogger=INFO, console\n\
//!      log4j.appender.console=ConsoleAppender\n\
//!      log4j.appender.console.layout=PatternLayout\n\
//!      log4j.appender.console.layout.ConversionPattern=%-5p %c: %m%n\n",
//! )
//! .unwrap();
//!
//! let _ctx = LogContext::new("worker").unwrap();
//! log_info!("started with {} threads", 4);
//! logs_debug!("suppressed at INFO");
//!
//! let db = get_logger("worker.db");
//! db.info(format_args!("connected"));
//! ```
//!
//! # See also
//!
//! - [`hierlog_backend`] for levels, appenders, layouts and the property
//!   configuration grammar.
//! - [`init_tracing`] for routing `tracing` events into the hierarchy.

mod bootstrap;
mod context;
mod error;
mod logger;
mod macros;
mod mdc;
mod mdc_init;
mod message;
mod system;
#[cfg(feature = "tracing-bridge")]
mod tracing_bridge;

use std::path::Path;

pub use bootstrap::{BootstrapSettings, DEFAULT_CONFIG_ENV, DEFAULT_FALLBACK_PATTERN};
pub use context::LogContext;
pub use error::ContextError;
pub use hierlog_backend::{
    Backend, BackendLogger, ConfigError, Hierarchy, LEVEL_UNSET, Level, Location, lwp_id,
};
pub use logger::{IntoLogger, LevelGuard, Logger};
pub use mdc::{MdcScope, mdc_get, mdc_put, mdc_remove};
pub use mdc_init::MdcInitToken;
pub use message::{MAX_LOG_MSG_LEN, format_bounded};
pub use system::LogSystem;
#[cfg(feature = "tracing-bridge")]
pub use tracing_bridge::{HierlogLayer, init_tracing, init_tracing_with_filter};

/// Re-export of the backend crate.
pub use hierlog_backend;

/// Resets the process-wide system and applies the default configuration.
pub fn configure() -> Result<(), ConfigError> {
    LogSystem::global().configure()
}

/// Resets the process-wide system and loads a configuration file.
pub fn configure_file(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    LogSystem::global().configure_file(path)
}

/// Resets the process-wide system and applies property text.
pub fn configure_properties(text: &str) -> Result<(), ConfigError> {
    LogSystem::global().configure_properties(text)
}

/// Current default logger of the process-wide system.
pub fn default_logger() -> Logger {
    LogSystem::global().default_logger()
}

/// Logger called `name` in the process-wide system; the empty name yields
/// the current default logger.
pub fn get_logger(name: &str) -> Logger {
    LogSystem::global().get_logger(name)
}

/// Root logger of the process-wide system.
pub fn root_logger() -> Logger {
    LogSystem::global().root_logger()
}

/// Sets the `TRACE0.name` through `TRACE5.name` loggers of the
/// process-wide system: `DEBUG` up to `threshold`, `INFO` above it.
pub fn trace_set_at(name: &str, threshold: i32) {
    LogSystem::global().trace_set_at(name, threshold);
}

/// Pushes a segment onto the process-wide context stack.
pub fn push_context(name: &str) -> Result<(), ContextError> {
    LogSystem::global().push_context(name)
}

/// Pops the most recent segment of the process-wide context stack.
pub fn pop_context() -> Result<String, ContextError> {
    LogSystem::global().pop_context()
}

/// Name of the current default logger of the process-wide system.
pub fn default_name() -> String {
    LogSystem::global().default_name()
}

/// Registers a per-thread MDC init function with the process-wide system.
///
/// ```
/// use std::sync::LazyLock;
/// use hierlog::{MdcInitToken, lwp_id, mdc_put, register_mdc_init};
///
/// static LWP_MDC: LazyLock<MdcInitToken> =
///     LazyLock::new(|| register_mdc_init(|| {
///         mdc_put("LWP", lwp_id().to_string());
///     }));
///
/// LazyLock::force(&LWP_MDC);
/// assert_eq!(hierlog::mdc_get("LWP"), Some(lwp_id().to_string()));
/// ```
pub fn register_mdc_init<F>(function: F) -> MdcInitToken
where
    F: Fn() + Send + Sync + 'static,
{
    LogSystem::global().register_mdc_init(function)
}
