//! Integration tests for conversion-pattern rendering.

use std::collections::BTreeMap;

use hierlog_backend::{Layout, Level, Location, Record};
use proptest::prelude::*;

fn render(pattern: &str, logger: &str, message: &str) -> String {
    let location = Location::new("src/net.rs", 42, "app::net");
    let record = Record::new(logger, Level::Warn, message, &location).with_mdc(BTreeMap::new());
    Layout::pattern(pattern).unwrap().format(&record)
}

// ============================================================================
// Conversions
// ============================================================================

/// Verifies the default fallback pattern renders logger, level and message.
#[test]
fn fallback_pattern_renders_expected_line() {
    assert_eq!(
        render("%c %p: %m%n", "net.http", "slow"),
        "net.http WARN: slow\n"
    );
}

/// Verifies the root logger renders as `root`.
#[test]
fn root_logger_renders_as_root() {
    assert_eq!(render("%c", "", "x"), "root");
}

/// Verifies location conversions.
#[test]
fn location_conversions() {
    assert_eq!(render("%F:%L %M", "a", ""), "src/net.rs:42 app::net");
    assert_eq!(render("%l", "a", ""), "src/net.rs(42)");
}

/// Verifies the context conversion renders every entry in key order.
#[test]
fn mdc_conversion_renders_sorted_entries() {
    let location = Location::default();
    let mdc: BTreeMap<String, String> = [("y", "foo"), ("x", "3")]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    let record = Record::new("a", Level::Info, "m", &location).with_mdc(mdc);

    let all = Layout::pattern("%X").unwrap().format(&record);
    let one = Layout::pattern("%X{y}|%X{missing}|").unwrap().format(&record);
    assert_eq!(all, "{{x,3}{y,foo}}");
    assert_eq!(one, "foo||");
}

/// Verifies an empty context renders as `{}`.
#[test]
fn empty_mdc_renders_braces() {
    assert_eq!(render("%X", "a", ""), "{}");
}

/// Verifies width and truncation modifiers.
#[test]
fn width_modifiers() {
    assert_eq!(render("[%-6p]", "a", ""), "[WARN  ]");
    assert_eq!(render("[%6p]", "a", ""), "[  WARN]");
    assert_eq!(render("[%.4c]", "alpha.beta", ""), "[beta]");
    assert_eq!(render("%c{1}", "alpha.beta.gamma", ""), "gamma");
}

/// Verifies simple layout output.
#[test]
fn simple_layout_line() {
    let location = Location::default();
    let record = Record::new("a", Level::Info, "hello", &location);
    assert_eq!(Layout::Simple.format(&record), "INFO - hello\n");
}

/// Verifies malformed patterns are rejected.
#[test]
fn unknown_conversion_is_rejected() {
    assert!(Layout::pattern("%Q").is_err());
    assert!(Layout::pattern("%X{open").is_err());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Verifies literal text without `%` passes through unchanged.
    #[test]
    fn literal_text_passes_through(text in "[a-zA-Z0-9 ,.:;_-]{0,40}") {
        prop_assert_eq!(render(&text, "a", "m"), text);
    }

    /// Verifies `%m` reproduces any message verbatim.
    #[test]
    fn message_is_verbatim(message in "\\PC{0,64}") {
        prop_assert_eq!(render("%m", "a", &message), message);
    }
}
