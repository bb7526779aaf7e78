//! crates/logging/src/macros.rs
//! Call-site macros.
//!
//! Every macro checks the logger's level before touching its arguments and
//! captures the file, line and module of the call site. The `log*` family
//! formats into the bounded buffer of [`Logger::log`](crate::Logger::log);
//! the `logs*` family builds an unbounded `String` first.
//!
//! Without a `logger:` argument the current default logger of the
//! process-wide system is used. `logger:` accepts a [`Logger`](crate::Logger),
//! a reference to one, or a logger name.

/// Location of the macro call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(::std::file!(), ::std::line!(), ::std::module_path!())
    };
}

/// Logs a bounded, formatted message at a runtime level.
///
/// ```
/// use hierlog::{Level, log};
///
/// log!(Level::Info, "processed {} items", 3);
/// log!(logger: "app.db", Level::Debug, "query took {}ms", 12);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = $crate::IntoLogger::into_logger($logger);
        let level: $crate::Level = $level;
        if logger.is_enabled_for(level) {
            logger.log(level, &$crate::location!(), ::std::format_args!($($arg)+));
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::log!(logger: $crate::default_logger(), $level, $($arg)+)
    };
}

/// Logs at `TRACE` through [`log!`].
#[macro_export]
macro_rules! log_trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Trace, $($arg)+)
    };
}

/// Logs at `DEBUG` through [`log!`].
#[macro_export]
macro_rules! log_debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

/// Logs at `INFO` through [`log!`].
#[macro_export]
macro_rules! log_info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

/// Logs at `WARN` through [`log!`].
#[macro_export]
macro_rules! log_warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warn, $($arg)+)
    };
}

/// Logs at `ERROR` through [`log!`].
#[macro_export]
macro_rules! log_error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}

/// Logs at `FATAL` through [`log!`].
#[macro_export]
macro_rules! log_fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Fatal, $($arg)+)
    };
}

/// Logs an unbounded formatted message at a runtime level.
///
/// The message is built with `format!` and emitted without the length cap
/// that [`log!`] applies.
#[macro_export]
macro_rules! logs {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = $crate::IntoLogger::into_logger($logger);
        let level: $crate::Level = $level;
        if logger.is_enabled_for(level) {
            logger.emit(level, &$crate::location!(), &::std::format!($($arg)+));
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $crate::default_logger(), $level, $($arg)+)
    };
}

/// Logs at `TRACE` through [`logs!`].
#[macro_export]
macro_rules! logs_trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Trace, $($arg)+)
    };
}

/// Logs at `DEBUG` through [`logs!`].
#[macro_export]
macro_rules! logs_debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Debug, $($arg)+)
    };
}

/// Logs at `INFO` through [`logs!`].
#[macro_export]
macro_rules! logs_info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Info, $($arg)+)
    };
}

/// Logs at `WARN` through [`logs!`].
#[macro_export]
macro_rules! logs_warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Warn, $($arg)+)
    };
}

/// Logs at `ERROR` through [`logs!`].
#[macro_export]
macro_rules! logs_error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Error, $($arg)+)
    };
}

/// Logs at `FATAL` through [`logs!`].
#[macro_export]
macro_rules! logs_fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::logs!(logger: $logger, $crate::Level::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::logs!($crate::Level::Fatal, $($arg)+)
    };
}

/// Sets a diagnostic context entry until the end of the enclosing block.
///
/// ```
/// use hierlog::{mdc_get, mdc_scope};
///
/// {
///     mdc_scope!("request", "r-17");
///     assert_eq!(mdc_get("request").as_deref(), Some("r-17"));
/// }
/// assert_eq!(mdc_get("request"), None);
/// ```
#[macro_export]
macro_rules! mdc_scope {
    ($key:expr, $value:expr) => {
        let _mdc_scope_guard = $crate::MdcScope::new($key, $value);
    };
}
