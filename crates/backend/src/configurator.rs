//! crates/backend/src/configurator.rs
//! Applies parsed properties to a [`Hierarchy`].
//!
//! Keys are accepted under either the `log4j.` or the `hierlog.` prefix;
//! keys with any other prefix are ignored. Recognised keys:
//!
//! | Key | Value |
//! |-----|-------|
//! | `rootLogger` (`rootCategory`) | `LEVEL[, appender]*` |
//! | `logger.<name>` (`category.<name>`) | `LEVEL[, appender]*` |
//! | `additivity.<name>` | `true` or `false` |
//! | `appender.<name>` | appender class |
//! | `appender.<name>.<option>` | appender option |
//!
//! `LEVEL` may be empty to leave the level untouched, or `INHERITED`/`NULL`
//! to clear it. A logger that lists appenders loses its previous ones first.
//! Appender classes are matched on the text after the last `.`, so
//! `org.apache.log4j.ConsoleAppender` and `ConsoleAppender` are equivalent.

use std::collections::HashMap;
use std::sync::Arc;

use crate::appender::{Appender, ConsoleAppender, ConsoleTarget, FileAppender, TracingAppender};
use crate::backend::BackendLogger;
use crate::error::ConfigError;
use crate::hierarchy::{Hierarchy, HierarchyLogger};
use crate::layout::Layout;
use crate::level::Level;
use crate::properties::Properties;

/// Key prefixes recognised by [`configure`].
pub const KEY_PREFIXES: [&str; 2] = ["log4j.", "hierlog."];

const DEFAULT_CONVERSION_PATTERN: &str = "%m%n";

/// Applies `properties` to `hierarchy`.
///
/// The root logger is configured first, then named loggers in key order.
/// Stops at the first error.
pub fn configure(hierarchy: &Hierarchy, properties: &Properties) -> Result<(), ConfigError> {
    let settings = normalize(properties);
    let mut factory = AppenderFactory {
        settings: &settings,
        built: HashMap::new(),
    };

    let root_spec = settings
        .get("rootLogger")
        .or_else(|| settings.get("rootCategory"));
    if let Some(spec) = root_spec {
        apply_logger(&hierarchy.root(), spec, &mut factory)?;
    }

    for prefix in ["logger.", "category."] {
        for (name, spec) in settings.with_prefix(prefix) {
            apply_logger(&hierarchy.get(name), spec, &mut factory)?;
        }
    }

    for (name, value) in settings.with_prefix("additivity.") {
        let additive = parse_bool(&format!("additivity.{name}"), value)?;
        hierarchy.get(name).set_additive(additive);
    }

    tracing::debug!(
        target: "hierlog::config",
        appenders = factory.built.len(),
        "applied property configuration"
    );
    Ok(())
}

fn normalize(properties: &Properties) -> Properties {
    properties
        .iter()
        .filter_map(|(key, value)| {
            KEY_PREFIXES
                .iter()
                .find_map(|prefix| key.strip_prefix(prefix))
                .map(|key| (key.to_owned(), value.trim().to_owned()))
        })
        .collect()
}

fn apply_logger(
    logger: &HierarchyLogger,
    spec: &str,
    factory: &mut AppenderFactory<'_>,
) -> Result<(), ConfigError> {
    let mut parts = spec.split(',').map(str::trim);
    let level = parts.next().unwrap_or_default();
    if !level.is_empty() {
        if level.eq_ignore_ascii_case("INHERITED") || level.eq_ignore_ascii_case("NULL") {
            logger.set_level(None);
        } else {
            logger.set_level(Some(level.parse::<Level>()?));
        }
    }

    let names: Vec<&str> = parts.filter(|name| !name.is_empty()).collect();
    if names.is_empty() {
        return Ok(());
    }
    logger.remove_all_appenders();
    for name in names {
        logger.add_appender(factory.build(name)?);
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidBool {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

fn short_class(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}

/// Builds appenders on first reference and shares them afterwards.
struct AppenderFactory<'a> {
    settings: &'a Properties,
    built: HashMap<String, Arc<dyn Appender>>,
}

impl<'a> AppenderFactory<'a> {
    fn build(&mut self, name: &str) -> Result<Arc<dyn Appender>, ConfigError> {
        if let Some(existing) = self.built.get(name) {
            return Ok(Arc::clone(existing));
        }
        let appender = self.create(name)?;
        self.built.insert(name.to_owned(), Arc::clone(&appender));
        Ok(appender)
    }

    /// Option keys match case-insensitively, so `File` and `file` agree.
    fn option(&self, name: &str, option: &str) -> Option<&'a str> {
        let settings = self.settings;
        settings
            .get(&format!("appender.{name}.{option}"))
            .or_else(|| {
                settings
                    .with_prefix(&format!("appender.{name}."))
                    .find(|(key, _)| key.eq_ignore_ascii_case(option))
                    .map(|(_, value)| value)
            })
    }

    fn create(&self, name: &str) -> Result<Arc<dyn Appender>, ConfigError> {
        let class = self
            .settings
            .get(&format!("appender.{name}"))
            .ok_or_else(|| ConfigError::UndefinedAppender {
                name: name.to_owned(),
            })?;

        let appender: Arc<dyn Appender> = match short_class(class) {
            "ConsoleAppender" => {
                let target = match self.option(name, "Target") {
                    None => ConsoleTarget::default(),
                    Some(value) => ConsoleTarget::from_option(value).ok_or_else(|| {
                        ConfigError::InvalidOption {
                            name: name.to_owned(),
                            option: "Target",
                            value: value.to_owned(),
                        }
                    })?,
                };
                Arc::new(ConsoleAppender::new(name, target, self.layout(name)?))
            }
            "FileAppender" => {
                let path = self
                    .option(name, "File")
                    .filter(|path| !path.is_empty())
                    .ok_or_else(|| ConfigError::MissingOption {
                        name: name.to_owned(),
                        option: "File",
                    })?;
                let append = match self.option(name, "Append") {
                    Some(value) => parse_bool(&format!("appender.{name}.Append"), value)?,
                    None => true,
                };
                Arc::new(FileAppender::open(name, path, append, self.layout(name)?)?)
            }
            "TracingAppender" => Arc::new(TracingAppender::new(name)),
            #[cfg(unix)]
            "SyslogAppender" => self.syslog(name)?,
            _ => {
                return Err(ConfigError::UnknownAppenderClass {
                    name: name.to_owned(),
                    class: class.to_owned(),
                });
            }
        };
        tracing::trace!(target: "hierlog::config", appender = name, class, "created appender");
        Ok(appender)
    }

    #[cfg(unix)]
    fn syslog(&self, name: &str) -> Result<Arc<dyn Appender>, ConfigError> {
        use crate::appender::SyslogAppender;
        use crate::appender::syslog::{DEFAULT_SYSLOG_TAG, SyslogFacility};

        let facility = match self.option(name, "Facility") {
            None => SyslogFacility::default(),
            Some(value) => {
                SyslogFacility::from_name(value).ok_or_else(|| ConfigError::InvalidOption {
                    name: name.to_owned(),
                    option: "Facility",
                    value: value.to_owned(),
                })?
            }
        };
        let tag = self.option(name, "Tag").unwrap_or(DEFAULT_SYSLOG_TAG);
        Ok(Arc::new(SyslogAppender::new(
            name,
            facility,
            tag,
            self.layout(name)?,
        )))
    }

    fn layout(&self, name: &str) -> Result<Layout, ConfigError> {
        let Some(class) = self.option(name, "layout") else {
            return Ok(Layout::default());
        };
        match short_class(class) {
            "SimpleLayout" => Ok(Layout::Simple),
            "PatternLayout" => Layout::pattern(
                self.option(name, "layout.ConversionPattern")
                    .unwrap_or(DEFAULT_CONVERSION_PATTERN),
            ),
            _ => Err(ConfigError::UnknownLayout {
                name: name.to_owned(),
                layout: class.to_owned(),
            }),
        }
    }
}
