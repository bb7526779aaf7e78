use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::level::ParseLevelError;

/// Error produced while loading or applying a configuration.
///
/// Configuration stops at the first error; settings applied before it remain
/// in effect.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A property line has no key.
    #[error("malformed property on line {line}: '{text}'")]
    MalformedLine {
        /// One-based line number of the offending logical line.
        line: usize,
        /// The offending text.
        text: String,
    },
    /// A level name was not recognised.
    #[error(transparent)]
    UnknownLevel(#[from] ParseLevelError),
    /// A boolean property held something other than `true`/`false`.
    #[error("invalid boolean '{value}' for '{key}'")]
    InvalidBool {
        /// Property key.
        key: String,
        /// Rejected value.
        value: String,
    },
    /// A logger references an appender with no definition.
    #[error("appender '{name}' is referenced but not defined")]
    UndefinedAppender {
        /// Appender name.
        name: String,
    },
    /// An appender definition names an unknown class.
    #[error("unknown appender class '{class}' for appender '{name}'")]
    UnknownAppenderClass {
        /// Appender name.
        name: String,
        /// Rejected class.
        class: String,
    },
    /// An appender definition names an unknown layout.
    #[error("unknown layout '{layout}' for appender '{name}'")]
    UnknownLayout {
        /// Appender name.
        name: String,
        /// Rejected layout.
        layout: String,
    },
    /// An appender option has an invalid value.
    #[error("invalid value '{value}' for option '{option}' of appender '{name}'")]
    InvalidOption {
        /// Appender name.
        name: String,
        /// Option key.
        option: &'static str,
        /// Rejected value.
        value: String,
    },
    /// An appender is missing a mandatory option.
    #[error("appender '{name}' requires option '{option}'")]
    MissingOption {
        /// Appender name.
        name: String,
        /// Missing option key.
        option: &'static str,
    },
    /// A conversion pattern failed to compile.
    #[error("invalid conversion pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// What went wrong.
        reason: String,
    },
    /// An appender target could not be opened.
    #[error("failed to open {} for appender '{name}': {source}", .path.display())]
    OpenAppender {
        /// Appender name.
        name: String,
        /// Target path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The backend cannot load this configuration format.
    #[error("{format} configuration is not supported ({})", .path.display())]
    UnsupportedFormat {
        /// Format name.
        format: &'static str,
        /// File that was requested.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn read_error_keeps_source() {
        let error = ConfigError::Read {
            path: PathBuf::from("/missing.properties"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(error.to_string().contains("/missing.properties"));
        assert_eq!(error.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn level_errors_convert_transparently() {
        let parse = "loud".parse::<crate::Level>().unwrap_err();
        let error = ConfigError::from(parse);
        assert_eq!(error.to_string(), "unknown level 'loud'");
    }
}
