//! crates/logging/src/system.rs
//! The log system: a backend plus the state the façade keeps around it.
//!
//! # Overview
//!
//! [`LogSystem`] bundles the backend with its configuration state, the
//! per-thread MDC init registry and the context stack. Programs normally use
//! the process-wide instance returned by [`LogSystem::global`] (through the
//! free functions at the crate root); tests and embedders create their own
//! with [`LogSystem::new`] to stay isolated.
//!
//! # Invariants
//!
//! - Every logger handed out is resolved after the system is configured.
//! - Explicit configuration always replaces the default configuration and
//!   the default configuration never runs after it.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use hierlog_backend::{Backend, ConfigError, Hierarchy, Level};

use crate::bootstrap::{self, Bootstrap, BootstrapSettings};
use crate::context::{ContextStack, LogContext};
use crate::error::ContextError;
use crate::logger::Logger;
use crate::mdc_init::{MdcInitRegistry, MdcInitToken};

static GLOBAL: OnceLock<Arc<LogSystem>> = OnceLock::new();

/// Number of `TRACE<n>` logger families adjusted by
/// [`LogSystem::trace_set_at`].
const TRACE_DEPTHS: i32 = 6;

/// A backend together with bootstrap state, MDC init hooks and the
/// logger-name context stack.
pub struct LogSystem {
    backend: Arc<dyn Backend>,
    bootstrap: Bootstrap,
    mdc_init: MdcInitRegistry,
    context: ContextStack,
}

impl LogSystem {
    /// Creates an unconfigured system over `backend` with default
    /// bootstrap settings.
    pub fn new(backend: Arc<dyn Backend>) -> Arc<Self> {
        Self::with_settings(backend, BootstrapSettings::default())
    }

    /// Creates an unconfigured system over `backend`.
    pub fn with_settings(backend: Arc<dyn Backend>, settings: BootstrapSettings) -> Arc<Self> {
        Arc::new(Self {
            backend,
            bootstrap: Bootstrap::new(settings),
            mdc_init: MdcInitRegistry::new(),
            context: ContextStack::default(),
        })
    }

    /// The process-wide system, created over a fresh [`Hierarchy`] on first
    /// use unless [`LogSystem::set_global`] installed another one.
    pub fn global() -> &'static Arc<Self> {
        GLOBAL.get_or_init(|| Self::new(Arc::new(Hierarchy::new())))
    }

    /// Installs `system` as the process-wide system.
    ///
    /// Fails, handing `system` back, once the global system exists.
    pub fn set_global(system: Arc<Self>) -> Result<(), Arc<Self>> {
        GLOBAL.set(system)
    }

    /// The backend this system drives.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Settings used by the default configuration.
    pub const fn settings(&self) -> &BootstrapSettings {
        self.bootstrap.settings()
    }

    /// Returns `true` once default or explicit configuration has run.
    pub fn is_configured(&self) -> bool {
        self.bootstrap.is_configured()
    }

    /// Applies the default configuration unless some configuration already
    /// ran. Safe to call from any number of threads.
    pub fn ensure_configured(&self) {
        self.bootstrap.ensure_configured(self.backend.as_ref());
    }

    /// Resets the backend and applies the default configuration: the file
    /// named by the configured environment variable, else the console
    /// fallback.
    pub fn configure(&self) -> Result<(), ConfigError> {
        self.bootstrap.reconfigure(self.backend.as_ref(), |backend| {
            self.bootstrap.default_config(backend)
        })
    }

    /// Resets the backend and loads `path`, as XML when the name ends in
    /// `.xml` and as property text otherwise.
    pub fn configure_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.bootstrap.reconfigure(self.backend.as_ref(), |backend| {
            bootstrap::load_file(backend, path)
        })
    }

    /// Resets the backend and applies property-style configuration text.
    pub fn configure_properties(&self, text: &str) -> Result<(), ConfigError> {
        self.bootstrap.reconfigure(self.backend.as_ref(), |backend| {
            backend.configure_properties(text)
        })
    }

    /// Logger named by the current context stack (the root logger when the
    /// stack is empty).
    pub fn default_logger(self: &Arc<Self>) -> Logger {
        self.resolve(&self.default_name())
    }

    /// Logger called `name`; the empty name yields [`default_logger`].
    ///
    /// [`default_logger`]: LogSystem::default_logger
    pub fn get_logger(self: &Arc<Self>, name: &str) -> Logger {
        if name.is_empty() {
            self.default_logger()
        } else {
            self.resolve(name)
        }
    }

    /// The root logger, regardless of the context stack.
    pub fn root_logger(self: &Arc<Self>) -> Logger {
        self.ensure_configured();
        Logger::new(Arc::clone(self), self.backend.root_logger())
    }

    fn resolve(self: &Arc<Self>, name: &str) -> Logger {
        self.ensure_configured();
        Logger::new(Arc::clone(self), self.backend.logger(name))
    }

    /// Sets the `TRACE0.name` through `TRACE5.name` loggers so that trace
    /// numbers up to `threshold` log at `DEBUG` and the rest stay at `INFO`.
    /// A negative threshold silences all six.
    pub fn trace_set_at(self: &Arc<Self>, name: &str, threshold: i32) {
        for depth in 0..TRACE_DEPTHS {
            let level = if depth > threshold {
                Level::Info
            } else {
                Level::Debug
            };
            self.resolve(&format!("TRACE{depth}.{name}")).set_level(level);
        }
        tracing::trace!(
            target: "hierlog::trace",
            logger = name,
            threshold,
            "set trace threshold"
        );
    }

    /// Appends `name` to the context stack.
    pub fn push_context(&self, name: &str) -> Result<(), ContextError> {
        self.context.push(name)?;
        tracing::trace!(target: "hierlog::context", segment = name, "pushed context");
        Ok(())
    }

    /// Removes and returns the most recently pushed segment.
    pub fn pop_context(&self) -> Result<String, ContextError> {
        self.context.pop()
    }

    /// Dotted name composed from the context stack, empty when nothing is
    /// pushed.
    pub fn default_name(&self) -> String {
        self.context.joined()
    }

    /// Pushes `name` and returns a guard that pops it when dropped.
    pub fn context(self: &Arc<Self>, name: &str) -> Result<LogContext, ContextError> {
        LogContext::push(Arc::clone(self), name)
    }

    /// Registers a function that prepares the diagnostic context of each
    /// thread before its first record. Runs it on the calling thread
    /// immediately.
    pub fn register_mdc_init<F>(&self, function: F) -> MdcInitToken
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.mdc_init.register(function)
    }

    /// Runs pending MDC init functions on the calling thread, once.
    pub fn ensure_thread_initialized(&self) {
        self.mdc_init.ensure_thread_initialized();
    }
}

impl fmt::Debug for LogSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSystem")
            .field("configured", &self.is_configured())
            .field("settings", self.settings())
            .field("context", &self.default_name())
            .field("mdc_init", &self.mdc_init)
            .finish_non_exhaustive()
    }
}
