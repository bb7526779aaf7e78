//! Integration tests for level inheritance and call-site gating.

use std::cell::Cell;
use std::sync::Arc;

use hierlog::hierlog_backend::{Layout, MemoryAppender};
use hierlog::{
    Backend, Hierarchy, LEVEL_UNSET, Level, LogSystem, log_debug, log_info, logs_trace,
};

fn configured(text: &str) -> (Arc<LogSystem>, MemoryAppender) {
    let hierarchy = Arc::new(Hierarchy::new());
    let system = LogSystem::new(Arc::clone(&hierarchy) as Arc<dyn Backend>);
    system.configure_properties(text).unwrap();
    let memory = MemoryAppender::new("mem", Layout::Simple);
    hierarchy.root().add_appender(Arc::new(memory.clone()));
    (system, memory)
}

// ============================================================================
// Inheritance
// ============================================================================

/// Verifies unset loggers inherit from the nearest configured ancestor.
#[test]
fn levels_inherit_from_nearest_ancestor() {
    let (system, _) = configured(
        "log4j.rootLogger=WARN\n\
         log4j.logger.app=DEBUG\n\
         log4j.logger.app.db.pool=ERROR\n",
    );

    assert_eq!(system.get_logger("other").effective_level(), Some(Level::Warn));
    assert_eq!(system.get_logger("app.http").effective_level(), Some(Level::Debug));
    assert_eq!(system.get_logger("app.db").effective_level(), Some(Level::Debug));
    assert_eq!(
        system.get_logger("app.db.pool.conn").effective_level(),
        Some(Level::Error)
    );
    assert_eq!(system.get_logger("app.db").level(), None);
    assert_eq!(system.get_logger("app.db").level_value(), LEVEL_UNSET);
    assert_eq!(system.get_logger("app").level_value(), Level::Debug.value());
}

/// Verifies clearing a level restores inheritance.
#[test]
fn clearing_level_restores_inheritance() {
    let (system, _) = configured("log4j.rootLogger=ERROR\n");
    let logger = system.get_logger("svc");
    logger.set_level(Level::Trace);
    assert!(logger.is_trace_enabled());

    logger.clear_level();
    assert!(!logger.is_warn_enabled());
    assert_eq!(logger.effective_level_value(), Level::Error.value());
}

/// Verifies the root level cannot be cleared.
#[test]
fn root_level_survives_clear() {
    let (system, _) = configured("log4j.rootLogger=INFO\n");
    let root = system.root_logger();
    root.clear_level();
    assert_eq!(root.level(), Some(Level::Info));
}

/// Verifies each enabled check follows the threshold ordering.
#[test]
fn enabled_checks_follow_ordering() {
    let (system, _) = configured("log4j.rootLogger=WARN\n");
    let logger = system.get_logger("order");
    assert!(!logger.is_trace_enabled());
    assert!(!logger.is_debug_enabled());
    assert!(!logger.is_info_enabled());
    assert!(logger.is_warn_enabled());
    assert!(logger.is_error_enabled());
    assert!(logger.is_fatal_enabled());
}

// ============================================================================
// Parents, temporary levels and trace thresholds
// ============================================================================

/// Verifies parent lookup walks one segment at a time up to the root.
#[test]
fn parent_chain_ends_at_root() {
    let (system, _) = configured("log4j.rootLogger=INFO\n");
    let names: Vec<String> = std::iter::successors(Some(system.get_logger("a.b.c")), |logger| {
        logger.parent()
    })
    .map(|logger| logger.name().to_owned())
    .collect();
    assert_eq!(names, ["a.b.c", "a.b", "a", ""]);
}

/// Verifies a level guard restores an absent level and inheritance resumes.
#[test]
fn level_guard_restores_unset_level() {
    let (system, memory) = configured("log4j.rootLogger=INFO\n");
    let logger = system.get_logger("batch");
    {
        let _verbose = logger.with_level(Level::Debug);
        log_debug!(logger: &logger, "inside");
    }
    log_debug!(logger: &logger, "outside");

    assert_eq!(logger.level(), None);
    assert_eq!(logger.effective_level(), Some(Level::Info));
    assert_eq!(memory.lines(), ["DEBUG - inside\n"]);
}

/// Verifies trace thresholds enable DEBUG up to the given number only.
#[test]
fn trace_set_at_enables_debug_up_to_threshold() {
    let (system, _) = configured("log4j.rootLogger=INFO\n");
    system.trace_set_at("fit", 1);
    let enabled: Vec<bool> = (0..6)
        .map(|depth| system.get_logger(&format!("TRACE{depth}.fit")).is_debug_enabled())
        .collect();
    assert_eq!(enabled, [true, true, false, false, false, false]);

    system.trace_set_at("fit", -1);
    assert!(!system.get_logger("TRACE0.fit").is_debug_enabled());
    assert_eq!(system.get_logger("TRACE5.fit").level(), Some(Level::Info));
}

// ============================================================================
// Call-site gating
// ============================================================================

/// Verifies disabled calls neither format nor evaluate their arguments.
#[test]
fn disabled_calls_skip_argument_evaluation() {
    let (system, memory) = configured("log4j.rootLogger=INFO\n");
    let logger = system.get_logger("lazy");
    let evaluated = Cell::new(0);
    let expensive = || {
        evaluated.set(evaluated.get() + 1);
        "value"
    };

    log_debug!(logger: &logger, "{}", expensive());
    logs_trace!(logger: &logger, "{}", expensive());
    assert_eq!(evaluated.get(), 0);

    log_info!(logger: &logger, "{}", expensive());
    assert_eq!(evaluated.get(), 1);
    assert_eq!(memory.lines(), ["INFO - value\n"]);
}

/// Verifies the closure form is only called when enabled.
#[test]
fn log_with_is_lazy() {
    let (system, memory) = configured("log4j.rootLogger=INFO\n");
    let logger = system.get_logger("closure");
    let location = hierlog::location!();

    logger.log_with(Level::Debug, &location, || unreachable!("disabled"));
    logger.log_with(Level::Error, &location, || "built".to_owned());

    assert_eq!(memory.lines(), ["ERROR - built\n"]);
}

/// Verifies the simple layout of every level.
#[test]
fn each_level_method_emits_its_level() {
    let (system, memory) = configured("log4j.rootLogger=TRACE\n");
    let logger = system.get_logger("levels");
    logger.trace(format_args!("t"));
    logger.debug(format_args!("d"));
    logger.info(format_args!("i"));
    logger.warn(format_args!("w"));
    logger.error(format_args!("e"));
    logger.fatal(format_args!("f"));

    assert_eq!(
        memory.lines(),
        [
            "TRACE - t\n",
            "DEBUG - d\n",
            "INFO - i\n",
            "WARN - w\n",
            "ERROR - e\n",
            "FATAL - f\n",
        ]
    );
}
