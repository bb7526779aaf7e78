//! crates/backend/src/hierarchy.rs
//! The built-in logger tree.
//!
//! # Design
//!
//! A [`Hierarchy`] owns one [`HierarchyLogger`] per dotted name plus the root
//! logger. Loggers are created lazily and never removed, so the handles the
//! façade caches stay valid for the backend's lifetime. Ancestors are found
//! by stripping trailing name components (`a.b.c` → `a.b` → `a` → root) and
//! looking each prefix up in the registry; prefixes nobody asked for do not
//! exist and are skipped.
//!
//! # Invariants
//!
//! - The root logger always carries a level (`DEBUG` until configured).
//! - Lookups of equal names return the same `Arc`.
//! - Records travel from the emitting logger up through its ancestors until
//!   a logger with additivity disabled has been visited.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::appender::{Appender, ConsoleAppender, ConsoleTarget};
use crate::backend::{Backend, BackendLogger};
use crate::configurator;
use crate::error::ConfigError;
use crate::layout::Layout;
use crate::level::Level;
use crate::location::Location;
use crate::properties::Properties;
use crate::record::Record;

/// Level the root logger carries before and after a reset.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Debug;

/// Name of the console appender installed by
/// [`Backend::configure_console`].
pub const CONSOLE_APPENDER_NAME: &str = "console";

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct Registry {
    root: Arc<HierarchyLogger>,
    loggers: RwLock<HashMap<String, Arc<HierarchyLogger>>>,
    warned_no_appenders: AtomicBool,
}

impl Registry {
    fn lookup(&self, name: &str) -> Option<Arc<HierarchyLogger>> {
        read(&self.loggers).get(name).cloned()
    }
}

/// Tree of named loggers with levels, appenders and additivity.
#[derive(Clone)]
pub struct Hierarchy {
    registry: Arc<Registry>,
}

impl Hierarchy {
    /// Creates an unconfigured hierarchy: root at `DEBUG`, no appenders.
    #[must_use]
    pub fn new() -> Self {
        let registry = Arc::new_cyclic(|weak: &Weak<Registry>| Registry {
            root: Arc::new(HierarchyLogger::new(String::new(), weak.clone())),
            loggers: RwLock::new(HashMap::new()),
            warned_no_appenders: AtomicBool::new(false),
        });
        registry.root.set_level(Some(DEFAULT_ROOT_LEVEL));
        Self { registry }
    }

    /// The root logger.
    #[must_use]
    pub fn root(&self) -> Arc<HierarchyLogger> {
        Arc::clone(&self.registry.root)
    }

    /// Returns the logger called `name`, creating it if needed.
    #[must_use]
    pub fn get(&self, name: &str) -> Arc<HierarchyLogger> {
        if name.is_empty() {
            return self.root();
        }
        if let Some(logger) = self.registry.lookup(name) {
            return logger;
        }
        let mut loggers = write(&self.registry.loggers);
        Arc::clone(loggers.entry(name.to_owned()).or_insert_with(|| {
            Arc::new(HierarchyLogger::new(
                name.to_owned(),
                Arc::downgrade(&self.registry),
            ))
        }))
    }

    /// Returns the logger called `name` only if it already exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> Option<Arc<HierarchyLogger>> {
        if name.is_empty() {
            return Some(self.root());
        }
        self.registry.lookup(name)
    }

    /// Names of every non-root logger created so far, sorted.
    #[must_use]
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read(&self.registry.loggers).keys().cloned().collect();
        names.sort();
        names
    }

    /// Clears all configuration while keeping every logger alive.
    pub fn reset(&self) {
        let registry = &self.registry;
        let root = &registry.root;
        root.remove_all_appenders();
        root.set_additive(true);
        root.set_level(Some(DEFAULT_ROOT_LEVEL));
        for logger in read(&registry.loggers).values() {
            logger.remove_all_appenders();
            logger.set_additive(true);
            logger.set_level(None);
        }
        registry.warned_no_appenders.store(false, Ordering::Relaxed);
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hierarchy")
            .field("loggers", &self.logger_names())
            .finish_non_exhaustive()
    }
}

impl Backend for Hierarchy {
    fn logger(&self, name: &str) -> Arc<dyn BackendLogger> {
        self.get(name)
    }

    fn root_logger(&self) -> Arc<dyn BackendLogger> {
        self.root()
    }

    fn reset_configuration(&self) {
        self.reset();
    }

    fn configure_console(&self, pattern: &str, level: Level) -> Result<(), ConfigError> {
        let layout = Layout::pattern(pattern)?;
        let appender = ConsoleAppender::new(CONSOLE_APPENDER_NAME, ConsoleTarget::Stdout, layout);
        let root = self.root();
        root.add_appender(Arc::new(appender));
        root.set_level(Some(level));
        Ok(())
    }

    fn configure_properties(&self, text: &str) -> Result<(), ConfigError> {
        let properties = Properties::parse(text)?;
        configurator::configure(self, &properties)
    }

    fn configure_property_file(&self, path: &Path) -> Result<(), ConfigError> {
        let properties = Properties::load(path)?;
        tracing::debug!(
            target: "hierlog::config",
            path = %path.display(),
            entries = properties.len(),
            "loading property configuration"
        );
        configurator::configure(self, &properties)
    }
}

/// One named node of a [`Hierarchy`].
pub struct HierarchyLogger {
    name: String,
    level: RwLock<Option<Level>>,
    appenders: RwLock<Vec<Arc<dyn Appender>>>,
    additive: AtomicBool,
    registry: Weak<Registry>,
}

impl HierarchyLogger {
    fn new(name: String, registry: Weak<Registry>) -> Self {
        Self {
            name,
            level: RwLock::new(None),
            appenders: RwLock::new(Vec::new()),
            additive: AtomicBool::new(true),
            registry,
        }
    }

    /// Returns `true` for the root logger.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Attaches an appender.
    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        write(&self.appenders).push(appender);
    }

    /// Detaches every appender.
    pub fn remove_all_appenders(&self) {
        write(&self.appenders).clear();
    }

    /// Appenders attached directly to this logger.
    #[must_use]
    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        read(&self.appenders).clone()
    }

    /// Number of appenders attached directly to this logger.
    #[must_use]
    pub fn appender_count(&self) -> usize {
        read(&self.appenders).len()
    }

    /// Whether records continue to ancestor appenders.
    #[must_use]
    pub fn is_additive(&self) -> bool {
        self.additive.load(Ordering::Relaxed)
    }

    /// Enables or disables propagation to ancestor appenders.
    pub fn set_additive(&self, additive: bool) {
        self.additive.store(additive, Ordering::Relaxed);
    }

    /// Existing ancestors, nearest first, ending with the root.
    fn ancestors(&self) -> Vec<Arc<HierarchyLogger>> {
        let Some(registry) = self.registry.upgrade() else {
            return Vec::new();
        };
        if self.is_root() {
            return Vec::new();
        }
        let mut chain: Vec<_> = self
            .name
            .rmatch_indices('.')
            .filter_map(|(index, _)| registry.lookup(&self.name[..index]))
            .collect();
        chain.push(Arc::clone(&registry.root));
        chain
    }

    fn dispatch(&self, record: &Record<'_>) {
        let mut delivered = self.append_own(record);
        if self.is_additive() {
            for ancestor in self.ancestors() {
                delivered |= ancestor.append_own(record);
                if !ancestor.is_additive() {
                    break;
                }
            }
        }
        if !delivered {
            self.warn_no_appenders();
        }
    }

    fn append_own(&self, record: &Record<'_>) -> bool {
        let appenders = self.appenders();
        for appender in &appenders {
            if let Err(error) = appender.append(record) {
                tracing::warn!(
                    target: "hierlog::appender",
                    appender = appender.name(),
                    %error,
                    "appender failed to write record"
                );
            }
        }
        !appenders.is_empty()
    }

    fn warn_no_appenders(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if !registry.warned_no_appenders.swap(true, Ordering::Relaxed) {
            let name = if self.is_root() { "root" } else { &self.name };
            eprintln!("hierlog: no appenders could be found for logger ({name})");
        }
    }
}

impl std::fmt::Debug for HierarchyLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyLogger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("appenders", &self.appender_count())
            .field("additive", &self.is_additive())
            .finish()
    }
}

impl BackendLogger for HierarchyLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> Option<Level> {
        *read(&self.level)
    }

    fn set_level(&self, level: Option<Level>) {
        if level.is_none() && self.is_root() {
            tracing::debug!(target: "hierlog::config", "ignoring attempt to clear the root level");
            return;
        }
        *write(&self.level) = level;
    }

    fn effective_level(&self) -> Option<Level> {
        self.level()
            .or_else(|| self.ancestors().iter().find_map(|logger| logger.level()))
    }

    fn forced_log(&self, level: Level, message: &str, location: &Location) {
        let record = Record::new(&self.name, level, message, location);
        self.dispatch(&record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appender::MemoryAppender;

    fn capture(logger: &HierarchyLogger) -> MemoryAppender {
        let memory = MemoryAppender::new("mem", Layout::pattern("%c %p %m").unwrap());
        logger.add_appender(Arc::new(memory.clone()));
        memory
    }

    #[test]
    fn equal_names_share_one_logger() {
        let hierarchy = Hierarchy::new();
        let a = hierarchy.get("main.task");
        let b = hierarchy.get("main.task");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&hierarchy.get(""), &hierarchy.root()));
    }

    #[test]
    fn root_starts_at_debug() {
        let hierarchy = Hierarchy::new();
        assert_eq!(hierarchy.root().level(), Some(Level::Debug));
        assert_eq!(hierarchy.root().appender_count(), 0);
    }

    #[test]
    fn effective_level_inherits_from_nearest_existing_ancestor() {
        let hierarchy = Hierarchy::new();
        hierarchy.root().set_level(Some(Level::Warn));
        hierarchy.get("a").set_level(Some(Level::Trace));
        let leaf = hierarchy.get("a.b.c");

        assert_eq!(leaf.level(), None);
        assert_eq!(leaf.effective_level(), Some(Level::Trace));
        assert_eq!(hierarchy.get("x.y").effective_level(), Some(Level::Warn));
    }

    #[test]
    fn enabled_check_compares_against_effective_level() {
        let hierarchy = Hierarchy::new();
        let logger = hierarchy.get("svc");
        logger.set_level(Some(Level::Info));
        assert!(!logger.is_enabled_for(Level::Debug));
        assert!(logger.is_enabled_for(Level::Info));
        assert!(logger.is_enabled_for(Level::Fatal));
    }

    #[test]
    fn root_level_cannot_be_cleared() {
        let hierarchy = Hierarchy::new();
        hierarchy.root().set_level(None);
        assert_eq!(hierarchy.root().level(), Some(Level::Debug));
    }

    #[test]
    fn records_reach_ancestor_appenders() {
        let hierarchy = Hierarchy::new();
        let root = capture(&hierarchy.root());
        let parent = capture(&hierarchy.get("a"));
        hierarchy
            .get("a.b")
            .forced_log(Level::Info, "hello", &Location::default());

        assert_eq!(parent.lines(), ["a.b INFO hello"]);
        assert_eq!(root.lines(), ["a.b INFO hello"]);
    }

    #[test]
    fn additivity_stops_propagation() {
        let hierarchy = Hierarchy::new();
        let root = capture(&hierarchy.root());
        let parent = hierarchy.get("a");
        let parent_capture = capture(&parent);
        parent.set_additive(false);

        hierarchy
            .get("a.b")
            .forced_log(Level::Warn, "contained", &Location::default());

        assert_eq!(parent_capture.lines().len(), 1);
        assert!(root.lines().is_empty());
    }

    #[test]
    fn forced_log_ignores_threshold() {
        let hierarchy = Hierarchy::new();
        let root = capture(&hierarchy.root());
        hierarchy.root().set_level(Some(Level::Error));
        hierarchy
            .root()
            .forced_log(Level::Trace, "forced", &Location::default());
        assert_eq!(root.lines(), ["root TRACE forced"]);
    }

    #[test]
    fn reset_clears_configuration_but_keeps_loggers() {
        let hierarchy = Hierarchy::new();
        let logger = hierarchy.get("keep.me");
        logger.set_level(Some(Level::Error));
        logger.set_additive(false);
        let _ = capture(&logger);
        hierarchy
            .configure_console("%m%n", Level::Info)
            .unwrap();

        hierarchy.reset();

        assert!(Arc::ptr_eq(&logger, &hierarchy.get("keep.me")));
        assert_eq!(logger.level(), None);
        assert!(logger.is_additive());
        assert_eq!(logger.appender_count(), 0);
        assert_eq!(hierarchy.root().appender_count(), 0);
        assert_eq!(hierarchy.root().level(), Some(Level::Debug));
    }

    #[test]
    fn configure_console_installs_one_root_appender() {
        let hierarchy = Hierarchy::new();
        hierarchy
            .configure_console("%c %p: %m%n", Level::Info)
            .unwrap();
        let root = hierarchy.root();
        assert_eq!(root.appender_count(), 1);
        assert_eq!(root.appenders()[0].name(), CONSOLE_APPENDER_NAME);
        assert_eq!(root.level(), Some(Level::Info));
    }

    #[test]
    fn configure_console_rejects_bad_pattern() {
        let hierarchy = Hierarchy::new();
        assert!(hierarchy.configure_console("%Q", Level::Info).is_err());
        assert_eq!(hierarchy.root().appender_count(), 0);
    }

    #[test]
    fn configure_console_rejects_unbounded_width() {
        let hierarchy = Hierarchy::new();
        let error = hierarchy
            .configure_console("%99999999999999999999m%n", Level::Info)
            .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidPattern { .. }));
        assert_eq!(hierarchy.root().appender_count(), 0);
    }

    #[test]
    fn logger_names_lists_created_loggers() {
        let hierarchy = Hierarchy::new();
        let _ = hierarchy.get("b");
        let _ = hierarchy.get("a.x");
        assert_eq!(hierarchy.logger_names(), ["a.x", "b"]);
        assert!(hierarchy.exists("a").is_none());
        assert!(hierarchy.exists("b").is_some());
    }
}
