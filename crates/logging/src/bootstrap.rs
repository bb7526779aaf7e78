//! crates/logging/src/bootstrap.rs
//! One-time default configuration and explicit reconfiguration.
//!
//! # Design
//!
//! A [`LogSystem`](crate::LogSystem) starts unconfigured. The first façade
//! call that needs a logger runs the bootstrap, which checks an atomic flag
//! without locking and otherwise takes the configuration mutex, re-checks
//! and applies the default configuration:
//!
//! 1. If the environment variable named by
//!    [`BootstrapSettings::config_env`] is set, non-empty and names a file
//!    that can be opened, that file is loaded (XML when the name ends in
//!    `.xml`, property text otherwise).
//! 2. Otherwise a console appender using
//!    [`BootstrapSettings::fallback_pattern`] is attached to the root logger
//!    and the root level is set to [`BootstrapSettings::fallback_level`].
//!
//! Explicit configuration takes the same mutex, resets the backend and
//! applies its own settings, so it always replaces whatever bootstrap did
//! and bootstrap never runs after it.
//!
//! # Errors
//!
//! Configuration failures are printed on standard error, logged as a
//! `tracing` warning and returned by the explicit entry points. The backend
//! keeps whatever the partial load applied.

use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use hierlog_backend::{Backend, ConfigError, Level};

/// Environment variable consulted by the default bootstrap.
pub const DEFAULT_CONFIG_ENV: &str = "HIERLOG_CONFIG";

/// Conversion pattern of the fallback console appender.
pub const DEFAULT_FALLBACK_PATTERN: &str = "%c %p: %m%n";

/// Knobs of the default configuration performed on first use.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BootstrapSettings {
    /// Environment variable naming a configuration file.
    pub config_env: Cow<'static, str>,
    /// Pattern used by the fallback console appender.
    pub fallback_pattern: Cow<'static, str>,
    /// Root level set by the fallback configuration.
    pub fallback_level: Level,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            config_env: Cow::Borrowed(DEFAULT_CONFIG_ENV),
            fallback_pattern: Cow::Borrowed(DEFAULT_FALLBACK_PATTERN),
            fallback_level: Level::Info,
        }
    }
}

impl BootstrapSettings {
    /// Uses `name` instead of `HIERLOG_CONFIG`.
    pub fn with_config_env(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config_env = name.into();
        self
    }

    /// Uses `pattern` for the fallback console appender.
    pub fn with_fallback_pattern(mut self, pattern: impl Into<Cow<'static, str>>) -> Self {
        self.fallback_pattern = pattern.into();
        self
    }

    /// Uses `level` as the fallback root level.
    pub fn with_fallback_level(mut self, level: Level) -> Self {
        self.fallback_level = level;
        self
    }

    /// Configuration file named by the environment, if it is usable.
    fn env_config_file(&self) -> Option<PathBuf> {
        let value = env::var_os(&*self.config_env)?;
        if value.is_empty() {
            return None;
        }
        let path = PathBuf::from(value);
        File::open(&path).ok().map(|_| path)
    }
}

/// Returns `true` when `path` should be loaded as XML.
pub(crate) fn is_xml(path: &Path) -> bool {
    path.as_os_str().as_encoded_bytes().ends_with(b".xml")
}

pub(crate) fn load_file(backend: &dyn Backend, path: &Path) -> Result<(), ConfigError> {
    if is_xml(path) {
        backend.configure_xml_file(path)
    } else {
        backend.configure_property_file(path)
    }
}

pub(crate) fn report(error: &ConfigError) {
    eprintln!("hierlog: configuration failed: {error}");
    tracing::warn!(target: "hierlog::config", %error, "configuration failed");
}

#[derive(Debug)]
pub(crate) struct Bootstrap {
    settings: BootstrapSettings,
    configured: AtomicBool,
    lock: Mutex<bool>,
}

impl Bootstrap {
    pub(crate) fn new(settings: BootstrapSettings) -> Self {
        Self {
            settings,
            configured: AtomicBool::new(false),
            lock: Mutex::new(false),
        }
    }

    pub(crate) const fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_configured(&self, backend: &dyn Backend) {
        if self.is_configured() {
            return;
        }
        let mut configured = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *configured {
            return;
        }
        *configured = true;
        if let Err(error) = self.default_config(backend) {
            report(&error);
        }
        self.configured.store(true, Ordering::Release);
    }

    /// Runs `apply` after resetting the backend, under the configuration lock.
    pub(crate) fn reconfigure<F>(&self, backend: &dyn Backend, apply: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&dyn Backend) -> Result<(), ConfigError>,
    {
        let mut configured = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        *configured = true;
        backend.reset_configuration();
        let result = apply(backend);
        self.configured.store(true, Ordering::Release);
        drop(configured);
        result.inspect_err(report)
    }

    /// The default configuration: environment file, else console fallback.
    pub(crate) fn default_config(&self, backend: &dyn Backend) -> Result<(), ConfigError> {
        if let Some(path) = self.settings.env_config_file() {
            tracing::debug!(
                target: "hierlog::config",
                path = %path.display(),
                variable = %self.settings.config_env,
                "configuring from environment"
            );
            return load_file(backend, &path);
        }
        tracing::debug!(
            target: "hierlog::config",
            pattern = %self.settings.fallback_pattern,
            level = %self.settings.fallback_level,
            "using fallback console configuration"
        );
        backend.configure_console(&self.settings.fallback_pattern, self.settings.fallback_level)
    }
}
