//! crates/logging/src/logger.rs
//! Logger handles.
//!
//! A [`Logger`] is a cheap clonable value naming one backend logger. Level
//! queries go straight to the backend; emission funnels through
//! [`Logger::emit`], which runs the thread's pending MDC init functions and
//! then forces the record into the backend without another level check.

use std::fmt;
use std::sync::Arc;

use hierlog_backend::{BackendLogger, Level, Location};

use crate::message;
use crate::system::LogSystem;

/// Handle to a named logger of a [`LogSystem`].
#[derive(Clone)]
pub struct Logger {
    system: Arc<LogSystem>,
    inner: Arc<dyn BackendLogger>,
}

impl Logger {
    pub(crate) fn new(system: Arc<LogSystem>, inner: Arc<dyn BackendLogger>) -> Self {
        Self { system, inner }
    }

    /// Dotted name of the logger, empty for the root logger.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns `true` for the root logger.
    pub fn is_root(&self) -> bool {
        self.name().is_empty()
    }

    /// The system this logger belongs to.
    pub fn system(&self) -> &Arc<LogSystem> {
        &self.system
    }

    /// The backend logger behind this handle.
    pub fn backend_logger(&self) -> &Arc<dyn BackendLogger> {
        &self.inner
    }

    /// Returns a descendant logger.
    ///
    /// Leading `.` and space characters of `suffix` are ignored. An empty
    /// suffix yields this logger; below the root the suffix itself is the
    /// name.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use hierlog::{Hierarchy, LogSystem};
    /// let system = LogSystem::new(Arc::new(Hierarchy::new()));
    /// let task = system.get_logger("main.task");
    /// assert_eq!(task.child(" .sub.algo").name(), "main.task.sub.algo");
    /// assert_eq!(task.child("").name(), "main.task");
    /// assert_eq!(system.root_logger().child("top").name(), "top");
    /// ```
    pub fn child(&self, suffix: &str) -> Self {
        let suffix = suffix.trim_start_matches(['.', ' ']);
        if suffix.is_empty() {
            return self.clone();
        }
        if self.is_root() {
            self.system.get_logger(suffix)
        } else {
            self.system.get_logger(&format!("{}.{suffix}", self.name()))
        }
    }

    /// The nearest logger above this one: `None` for the root logger, the
    /// root logger for single-segment names.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use hierlog::{Hierarchy, LogSystem};
    /// let system = LogSystem::new(Arc::new(Hierarchy::new()));
    /// let pool = system.get_logger("app.db.pool");
    /// assert_eq!(pool.parent().map(|p| p.name().to_owned()).as_deref(), Some("app.db"));
    /// assert!(system.get_logger("app").parent().is_some_and(|p| p.is_root()));
    /// assert!(system.root_logger().parent().is_none());
    /// ```
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.name().rsplit_once('.') {
            Some((prefix, _)) => self.system.get_logger(prefix),
            None => self.system.root_logger(),
        })
    }

    /// Assigns `level` until the returned guard is dropped, then restores
    /// the level assigned before, or its absence.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use hierlog::{Hierarchy, Level, LogSystem};
    /// let system = LogSystem::new(Arc::new(Hierarchy::new()));
    /// let logger = system.get_logger("noisy");
    /// {
    ///     let _quiet = logger.with_level(Level::Error);
    ///     assert!(!logger.is_warn_enabled());
    /// }
    /// assert_eq!(logger.level(), None);
    /// ```
    pub fn with_level(&self, level: Level) -> LevelGuard {
        let previous = self.level();
        self.set_level(level);
        LevelGuard {
            logger: self.clone(),
            previous,
        }
    }

    /// Assigns a level to this logger.
    pub fn set_level(&self, level: Level) {
        self.inner.set_level(Some(level));
    }

    /// Removes this logger's level so it inherits from its ancestors. Has no
    /// effect on the root logger of the built-in backend.
    pub fn clear_level(&self) {
        self.inner.set_level(None);
    }

    /// Level assigned to this logger, if any.
    pub fn level(&self) -> Option<Level> {
        self.inner.level()
    }

    /// Level in force, inherited when none is assigned.
    pub fn effective_level(&self) -> Option<Level> {
        self.inner.effective_level()
    }

    /// Numeric form of [`Logger::level`], `-1` when unset.
    pub fn level_value(&self) -> i32 {
        Level::value_or_unset(self.level())
    }

    /// Numeric form of [`Logger::effective_level`], `-1` when unset.
    pub fn effective_level_value(&self) -> i32 {
        Level::value_or_unset(self.effective_level())
    }

    /// Returns `true` when records of `level` pass this logger's threshold.
    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.inner.is_enabled_for(level)
    }

    /// Shorthand for `is_enabled_for(Level::Trace)`.
    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled_for(Level::Trace)
    }

    /// Shorthand for `is_enabled_for(Level::Debug)`.
    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled_for(Level::Debug)
    }

    /// Shorthand for `is_enabled_for(Level::Info)`.
    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled_for(Level::Info)
    }

    /// Shorthand for `is_enabled_for(Level::Warn)`.
    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled_for(Level::Warn)
    }

    /// Shorthand for `is_enabled_for(Level::Error)`.
    pub fn is_error_enabled(&self) -> bool {
        self.is_enabled_for(Level::Error)
    }

    /// Shorthand for `is_enabled_for(Level::Fatal)`.
    pub fn is_fatal_enabled(&self) -> bool {
        self.is_enabled_for(Level::Fatal)
    }

    /// Formats `args` into at most [`MAX_LOG_MSG_LEN`](crate::MAX_LOG_MSG_LEN)
    /// bytes and emits the result. Does not check the level; callers do.
    pub fn log(&self, level: Level, location: &Location, args: fmt::Arguments<'_>) {
        self.emit(level, location, &message::format_bounded(args));
    }

    /// Builds the message with `message` only if `level` is enabled, then
    /// emits it unbounded.
    pub fn log_with<F>(&self, level: Level, location: &Location, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.is_enabled_for(level) {
            self.emit(level, location, &message());
        }
    }

    /// Sends `message` to the backend as is.
    pub fn emit(&self, level: Level, location: &Location, message: &str) {
        self.system.ensure_thread_initialized();
        self.inner.forced_log(level, message, location);
    }

    #[track_caller]
    fn log_checked(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.is_enabled_for(level) {
            self.log(level, &Location::caller(), args);
        }
    }

    /// Logs at `TRACE` if enabled. The location is the caller's file and line.
    #[track_caller]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Trace, args);
    }

    /// Logs at `DEBUG` if enabled.
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Debug, args);
    }

    /// Logs at `INFO` if enabled.
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Info, args);
    }

    /// Logs at `WARN` if enabled.
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Warn, args);
    }

    /// Logs at `ERROR` if enabled.
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Error, args);
    }

    /// Logs at `FATAL` if enabled.
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log_checked(Level::Fatal, args);
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.system, &other.system)
            && std::ptr::eq(
                Arc::as_ptr(&self.inner).cast::<()>(),
                Arc::as_ptr(&other.inner).cast::<()>(),
            )
    }
}

impl Eq for Logger {}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

/// Restores a logger's previous level when dropped. Returned by
/// [`Logger::with_level`].
#[must_use = "the previous level is restored as soon as the guard is dropped"]
pub struct LevelGuard {
    logger: Logger,
    previous: Option<Level>,
}

impl LevelGuard {
    /// The logger whose level is held.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl Drop for LevelGuard {
    fn drop(&mut self) {
        self.logger.inner.set_level(self.previous);
    }
}

impl fmt::Debug for LevelGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelGuard")
            .field("logger", &self.logger.name())
            .field("previous", &self.previous)
            .finish()
    }
}

/// Conversion used by the logging macros' `logger:` argument.
pub trait IntoLogger {
    /// Resolves `self` to a logger handle.
    fn into_logger(self) -> Logger;
}

impl IntoLogger for Logger {
    fn into_logger(self) -> Logger {
        self
    }
}

impl IntoLogger for &Logger {
    fn into_logger(self) -> Logger {
        self.clone()
    }
}

/// Looks the name up in the process-wide system.
impl IntoLogger for &str {
    fn into_logger(self) -> Logger {
        LogSystem::global().get_logger(self)
    }
}

impl IntoLogger for &String {
    fn into_logger(self) -> Logger {
        self.as_str().into_logger()
    }
}

impl IntoLogger for String {
    fn into_logger(self) -> Logger {
        self.as_str().into_logger()
    }
}
