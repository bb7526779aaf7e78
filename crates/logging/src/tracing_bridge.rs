//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the logger hierarchy.
//!
//! This module provides a tracing-subscriber layer that routes tracing events
//! into a [`LogSystem`]. Libraries instrumented with the standard tracing
//! macros then share appenders, levels and diagnostic context with code that
//! logs through this crate.
//!
//! # Mapping
//!
//! - The event target becomes the logger name, with `::` replaced by `.`
//!   (`app::db` → `app.db`).
//! - tracing levels map one to one; `ERROR` maps to [`Level::Error`].
//! - The event is dropped unless the logger is enabled for the mapped level.
//! - Events whose target starts with `hierlog` are ignored, so records
//!   forwarded by a `TracingAppender` and this crate's own diagnostics never
//!   loop back into the hierarchy.
//!
//! # Usage
//!
//! ```rust,no_run
//! hierlog::init_tracing();
//!
//! tracing::info!(target: "app::db", "connected");
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use hierlog_backend::{Level, Location};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::system::LogSystem;

/// Target prefix of events the layer never forwards.
pub const IGNORED_TARGET_PREFIX: &str = "hierlog";

/// A tracing layer that forwards events to a [`LogSystem`].
#[derive(Debug)]
pub struct HierlogLayer {
    system: Arc<LogSystem>,
}

impl HierlogLayer {
    /// Creates a layer forwarding into `system`.
    #[must_use]
    pub const fn new(system: Arc<LogSystem>) -> Self {
        Self { system }
    }

    /// Creates a layer forwarding into the process-wide system.
    #[must_use]
    pub fn global() -> Self {
        Self::new(Arc::clone(LogSystem::global()))
    }

    /// Map a tracing target to a logger name.
    fn target_to_logger_name(target: &str) -> String {
        target.replace("::", ".")
    }

    /// Map a tracing level to a hierarchy level.
    const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Trace,
        }
    }
}

impl<S> Layer<S> for HierlogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if target.starts_with(IGNORED_TARGET_PREFIX) {
            return;
        }

        let logger = self
            .system
            .get_logger(&Self::target_to_logger_name(target));
        let level = Self::map_level(metadata.level());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let location = Location::new(
            metadata.file().unwrap_or_default(),
            metadata.line().unwrap_or_default(),
            metadata.module_path().unwrap_or_default(),
        );
        logger.emit(level, &location, &visitor.finish());
    }
}

/// Visitor collecting the message and any extra fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), &format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field.name(), &value);
        }
    }
}

/// Routes tracing events into the process-wide log system.
///
/// Installs a global subscriber; panics if one is already set, like
/// [`SubscriberInitExt::init`](tracing_subscriber::util::SubscriberInitExt::init).
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(HierlogLayer::global())
        .init();
}

/// Routes tracing events into the process-wide log system after `filter`.
///
/// # Example
///
/// ```rust,no_run
/// use tracing_subscriber::EnvFilter;
///
/// hierlog::init_tracing_with_filter(EnvFilter::from_default_env());
/// ```
pub fn init_tracing_with_filter<F>(filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(HierlogLayer::global())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_to_logger_name() {
        assert_eq!(HierlogLayer::target_to_logger_name("app::db"), "app.db");
        assert_eq!(HierlogLayer::target_to_logger_name("plain"), "plain");
        assert_eq!(
            HierlogLayer::target_to_logger_name("a::b::c"),
            "a.b.c"
        );
    }

    #[test]
    fn test_map_level() {
        assert_eq!(HierlogLayer::map_level(&tracing::Level::ERROR), Level::Error);
        assert_eq!(HierlogLayer::map_level(&tracing::Level::WARN), Level::Warn);
        assert_eq!(HierlogLayer::map_level(&tracing::Level::INFO), Level::Info);
        assert_eq!(HierlogLayer::map_level(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(HierlogLayer::map_level(&tracing::Level::TRACE), Level::Trace);
    }

    #[test]
    fn test_visitor_joins_message_and_fields() {
        let visitor = MessageVisitor {
            message: "connected".to_owned(),
            fields: "host=db1 port=5432".to_owned(),
        };
        assert_eq!(visitor.finish(), "connected host=db1 port=5432");
        assert_eq!(MessageVisitor::default().finish(), "");
    }
}
