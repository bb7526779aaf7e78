//! crates/backend/src/level.rs
//! Severity levels understood by the logger hierarchy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Value reported by level queries when a logger carries no level.
pub const LEVEL_UNSET: i32 = -1;

/// Severity of a log record, ordered from least to most severe.
///
/// The numeric values follow the log4j scale so configuration files and
/// integer-based callers keep their meaning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Level {
    /// Finest-grained tracing output.
    Trace = 5000,
    /// Diagnostic output useful while debugging.
    Debug = 10000,
    /// Informational progress messages.
    Info = 20000,
    /// Recoverable problems.
    Warn = 30000,
    /// Failed operations.
    Error = 40000,
    /// Failures the process cannot continue past.
    Fatal = 50000,
}

impl Level {
    /// Every level in ascending severity.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Returns the numeric value of the level.
    #[must_use]
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Maps a numeric value back to a level. Only exact values match.
    #[must_use]
    pub const fn from_value(value: i32) -> Option<Self> {
        match value {
            5000 => Some(Self::Trace),
            10000 => Some(Self::Debug),
            20000 => Some(Self::Info),
            30000 => Some(Self::Warn),
            40000 => Some(Self::Error),
            50000 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Converts an optional level into its numeric value, using
    /// [`LEVEL_UNSET`] for `None`.
    #[must_use]
    pub const fn value_or_unset(level: Option<Self>) -> i32 {
        match level {
            Some(level) => level.value(),
            None => LEVEL_UNSET,
        }
    }

    /// Upper-case name used by layouts and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a level name is not recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown level '{name}'")]
pub struct ParseLevelError {
    name: String,
}

impl ParseLevelError {
    /// The rejected level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(ParseLevelError {
                name: s.trim().to_owned(),
            }),
        }
    }
}
