#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/backend/src/lib.rs
//!
//! # Overview
//!
//! `hierlog-backend` is the logging engine behind the `hierlog` façade. It
//! keeps a tree of dotted logger names, each with an optional level, a list
//! of appenders and an additivity flag, and it renders records through
//! layouts into consoles, files, syslog or `tracing`.
//!
//! # Design
//!
//! The façade talks to the engine through two traits: [`Backend`] resolves
//! loggers and applies configuration, [`BackendLogger`] answers level queries
//! and emits records. [`Hierarchy`] is the built-in implementation. Property
//! text is parsed by [`Properties`] and applied by [`configurator::configure`].
//! The per-thread diagnostic context lives in [`mdc`] and is copied into
//! every [`Record`] at emission time.
//!
//! # Invariants
//!
//! - Levels are totally ordered `TRACE < DEBUG < INFO < WARN < ERROR < FATAL`.
//! - The root logger always has a level.
//! - Loggers are never destroyed, so handles stay valid for the hierarchy's
//!   lifetime.
//!
//! # Errors
//!
//! Configuration failures surface as [`ConfigError`]. Appender write
//! failures are reported through `tracing` under the `hierlog::appender`
//! target and never reach the logging caller.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use hierlog_backend::{
//!     Backend, BackendLogger, Hierarchy, Layout, Level, Location, MemoryAppender,
//! };
//!
//! let hierarchy = Hierarchy::new();
//! let memory = MemoryAppender::new("mem", Layout::pattern("%c %p: %m").unwrap());
//! hierarchy.root().add_appender(Arc::new(memory.clone()));
//! hierarchy.root().set_level(Some(Level::Info));
//!
//! let logger = hierarchy.logger("net.http");
//! assert!(!logger.is_enabled_for(Level::Debug));
//! logger.forced_log(Level::Warn, "slow response", &Location::default());
//! assert_eq!(memory.lines(), ["net.http WARN: slow response"]);
//! ```

pub mod appender;
mod backend;
pub mod configurator;
mod error;
mod hierarchy;
mod layout;
mod level;
mod location;
pub mod mdc;
mod properties;
mod record;
mod thread;

pub use appender::{
    Appender, ConsoleAppender, ConsoleTarget, FileAppender, MemoryAppender, TracingAppender,
};
pub use backend::{Backend, BackendLogger};
pub use error::ConfigError;
pub use hierarchy::{CONSOLE_APPENDER_NAME, DEFAULT_ROOT_LEVEL, Hierarchy, HierarchyLogger};
pub use layout::{Layout, MAX_FIELD_WIDTH, PatternLayout, ROOT_LOGGER_NAME};
pub use level::{LEVEL_UNSET, Level, ParseLevelError};
pub use location::Location;
pub use properties::Properties;
pub use record::Record;
pub use thread::lwp_id;
