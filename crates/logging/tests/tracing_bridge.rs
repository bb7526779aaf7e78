//! Integration tests for routing `tracing` events into a log system.
#![cfg(feature = "tracing-bridge")]

use std::sync::Arc;

use hierlog::hierlog_backend::{Layout, MemoryAppender};
use hierlog::{Backend, Hierarchy, HierlogLayer, LogSystem};
use tracing_subscriber::layer::SubscriberExt;

fn capture(config: &str) -> (Arc<LogSystem>, MemoryAppender) {
    let hierarchy = Arc::new(Hierarchy::new());
    let system = LogSystem::new(Arc::clone(&hierarchy) as Arc<dyn Backend>);
    system.configure_properties(config).unwrap();
    let memory = MemoryAppender::new("mem", Layout::pattern("%p %c: %m%n").unwrap());
    hierarchy.root().add_appender(Arc::new(memory.clone()));
    (system, memory)
}

fn with_bridge(system: &Arc<LogSystem>, body: impl FnOnce()) {
    let subscriber = tracing_subscriber::registry().with(HierlogLayer::new(Arc::clone(system)));
    tracing::subscriber::with_default(subscriber, body);
}

/// Verifies targets map to dotted logger names and fields are appended.
#[test]
fn events_reach_target_logger() {
    let (system, memory) = capture("log4j.rootLogger=INFO\n");
    with_bridge(&system, || {
        tracing::info!(target: "app::db", host = "db1", port = 5432, "connected");
        tracing::warn!(target: "app", "slow start");
    });

    assert_eq!(
        memory.lines(),
        [
            "INFO app.db: connected host=db1 port=5432\n",
            "WARN app: slow start\n",
        ]
    );
}

/// Verifies the hierarchy's levels filter bridged events.
#[test]
fn hierarchy_levels_filter_events() {
    let (system, memory) = capture(
        "log4j.rootLogger=WARN\n\
         log4j.logger.chatty=TRACE\n",
    );
    with_bridge(&system, || {
        tracing::info!(target: "quiet", "dropped");
        tracing::trace!(target: "chatty::inner", "kept");
        tracing::error!(target: "quiet", "kept too");
    });

    assert_eq!(
        memory.lines(),
        ["TRACE chatty.inner: kept\n", "ERROR quiet: kept too\n"]
    );
}

/// Verifies this crate's own diagnostics are not fed back.
#[test]
fn own_targets_are_ignored() {
    let (system, memory) = capture("log4j.rootLogger=TRACE\n");
    with_bridge(&system, || {
        tracing::warn!(target: "hierlog::appender", "would loop");
        let _token = system.register_mdc_init(|| {});
    });
    assert!(memory.lines().is_empty());
}
