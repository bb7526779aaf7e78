//! crates/backend/src/backend.rs
//! Capability traits the façade consumes.
//!
//! The façade never names a concrete backend type. It resolves loggers,
//! queries and sets levels, and emits records through these traits, and it
//! drives configuration through [`Backend`]'s configuration entry points.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::level::Level;
use crate::location::Location;

/// A logger owned by a backend.
///
/// Handles are shared: every lookup of an equal name must return a handle
/// to the same underlying logger, and that logger lives as long as the
/// backend does.
pub trait BackendLogger: Send + Sync + fmt::Debug {
    /// Dotted logger name, empty for the root logger.
    fn name(&self) -> &str;

    /// Level explicitly assigned to this logger.
    fn level(&self) -> Option<Level>;

    /// Assigns (or with `None` clears) this logger's level.
    fn set_level(&self, level: Option<Level>);

    /// Level in force for this logger, inherited from the nearest ancestor
    /// when none is assigned.
    fn effective_level(&self) -> Option<Level>;

    /// Returns `true` when records of `level` pass this logger's threshold.
    fn is_enabled_for(&self, level: Level) -> bool {
        self.effective_level().is_some_and(|threshold| level >= threshold)
    }

    /// Emits a record without consulting the threshold.
    fn forced_log(&self, level: Level, message: &str, location: &Location);
}

/// A logging engine the façade can configure and resolve loggers from.
pub trait Backend: Send + Sync {
    /// Returns the logger with the given dotted name, creating it on first
    /// use. The empty name resolves to the root logger.
    fn logger(&self, name: &str) -> Arc<dyn BackendLogger>;

    /// Returns the root logger.
    fn root_logger(&self) -> Arc<dyn BackendLogger>;

    /// Removes all configuration: appenders are dropped, levels cleared and
    /// the root level restored to `DEBUG`. Loggers themselves survive.
    fn reset_configuration(&self);

    /// Attaches a console appender using `pattern` to the root logger and
    /// sets the root level.
    fn configure_console(&self, pattern: &str, level: Level) -> Result<(), ConfigError>;

    /// Applies property-style configuration text.
    fn configure_properties(&self, text: &str) -> Result<(), ConfigError>;

    /// Loads a property-style configuration file.
    fn configure_property_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.configure_properties(&text)
    }

    /// Loads an XML configuration file.
    ///
    /// Backends without XML support keep the default, which reports
    /// [`ConfigError::UnsupportedFormat`].
    fn configure_xml_file(&self, path: &Path) -> Result<(), ConfigError> {
        Err(ConfigError::UnsupportedFormat {
            format: "XML",
            path: path.to_path_buf(),
        })
    }
}
