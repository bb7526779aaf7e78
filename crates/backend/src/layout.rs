//! crates/backend/src/layout.rs
//! Rendering of records into text lines.
//!
//! Two layouts are supported:
//!
//! - [`Layout::Simple`] renders `LEVEL - message` followed by a newline.
//! - [`Layout::Pattern`] renders a compiled conversion pattern. Supported
//!   conversions are `%c` (logger, `root` for the root logger, `%c{N}` keeps
//!   the last `N` components), `%p` (level), `%m` (message), `%n` (newline),
//!   `%F` (file), `%L` (line), `%M` (module), `%l` (`file(line)`), `%t`
//!   (thread name, or LWP id for unnamed threads), `%X` (whole context as
//!   `{{k,v}{k2,v2}}`), `%X{key}` (one context entry) and `%%`.
//!
//! Every conversion accepts an optional `-` flag (left-justify), a minimum
//! width and a `.N` maximum width that keeps the rightmost `N` characters,
//! e.g. `%-5p` or `%.10c`. Widths above [`MAX_FIELD_WIDTH`] are rejected
//! when the pattern is compiled.

use std::fmt::Write as _;

use crate::error::ConfigError;
use crate::record::Record;

/// Name rendered by `%c` for the root logger.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Largest minimum or maximum width a conversion may request.
pub const MAX_FIELD_WIDTH: usize = 4096;

/// Formats records into text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// `LEVEL - message\n`.
    Simple,
    /// A compiled conversion pattern.
    Pattern(PatternLayout),
}

impl Layout {
    /// Compiles `pattern` into a pattern layout.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        PatternLayout::new(pattern).map(Self::Pattern)
    }

    /// Renders `record` into a new string.
    #[must_use]
    pub fn format(&self, record: &Record<'_>) -> String {
        match self {
            Self::Simple => format!("{} - {}\n", record.level(), record.message()),
            Self::Pattern(pattern) => pattern.format(record),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::Simple
    }
}

/// A compiled conversion pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternLayout {
    pattern: String,
    segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Convert { spec: Spec, conversion: Conversion },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Spec {
    left_justify: bool,
    min_width: usize,
    max_width: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Conversion {
    Logger(Option<usize>),
    Level,
    Message,
    Newline,
    File,
    Line,
    Module,
    Location,
    Thread,
    Mdc(Option<String>),
}

impl PatternLayout {
    /// Compiles a conversion pattern.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let segments = Parser::new(pattern).parse()?;
        Ok(Self {
            pattern: pattern.to_owned(),
            segments,
        })
    }

    /// The source pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Renders `record` according to the pattern.
    #[must_use]
    pub fn format(&self, record: &Record<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + record.message().len() + 32);
        let mut field = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Convert { spec, conversion } => {
                    field.clear();
                    render(conversion, record, &mut field);
                    apply_spec(*spec, &field, &mut out);
                }
            }
        }
        out
    }
}

fn render(conversion: &Conversion, record: &Record<'_>, out: &mut String) {
    match conversion {
        Conversion::Logger(precision) => {
            let name = if record.logger().is_empty() {
                ROOT_LOGGER_NAME
            } else {
                record.logger()
            };
            out.push_str(last_components(name, *precision));
        }
        Conversion::Level => out.push_str(record.level().as_str()),
        Conversion::Message => out.push_str(record.message()),
        Conversion::Newline => out.push('\n'),
        Conversion::File => out.push_str(record.location().file()),
        Conversion::Line => {
            let _ = write!(out, "{}", record.location().line());
        }
        Conversion::Module => out.push_str(record.location().module()),
        Conversion::Location => {
            let _ = write!(out, "{}", record.location());
        }
        Conversion::Thread => match record.thread_name() {
            Some(name) => out.push_str(name),
            None => {
                let _ = write!(out, "{}", record.lwp());
            }
        },
        Conversion::Mdc(Some(key)) => {
            if let Some(value) = record.mdc().get(key) {
                out.push_str(value);
            }
        }
        Conversion::Mdc(None) => {
            out.push('{');
            for (key, value) in record.mdc() {
                let _ = write!(out, "{{{key},{value}}}");
            }
            out.push('}');
        }
    }
}

fn last_components(name: &str, precision: Option<usize>) -> &str {
    let Some(keep) = precision else {
        return name;
    };
    if keep == 0 {
        return name;
    }
    match name.rmatch_indices('.').nth(keep - 1) {
        Some((index, _)) => &name[index + 1..],
        None => name,
    }
}

fn apply_spec(spec: Spec, field: &str, out: &mut String) {
    let mut text = field;
    if let Some(max) = spec.max_width {
        let chars = text.chars().count();
        if chars > max {
            let skip = chars - max;
            let start = text.char_indices().nth(skip).map_or(text.len(), |(i, _)| i);
            text = &text[start..];
        }
    }
    let width = text.chars().count();
    let padding = spec.min_width.saturating_sub(width);
    if spec.left_justify {
        out.push_str(text);
        out.extend(std::iter::repeat_n(' ', padding));
    } else {
        out.extend(std::iter::repeat_n(' ', padding));
        out.push_str(text);
    }
}

struct Parser<'a> {
    pattern: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    segments: Vec<Segment>,
    literal: String,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.chars().peekable(),
            segments: Vec::new(),
            literal: String::new(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidPattern {
            pattern: self.pattern.to_owned(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Vec<Segment>, ConfigError> {
        while let Some(ch) = self.chars.next() {
            if ch != '%' {
                self.literal.push(ch);
                continue;
            }
            if self.chars.peek() == Some(&'%') {
                self.chars.next();
                self.literal.push('%');
                continue;
            }
            let spec = self.parse_spec()?;
            let conversion = self.parse_conversion()?;
            if !self.literal.is_empty() {
                self.segments
                    .push(Segment::Literal(std::mem::take(&mut self.literal)));
            }
            self.segments.push(Segment::Convert { spec, conversion });
        }
        if !self.literal.is_empty() {
            self.segments.push(Segment::Literal(self.literal));
        }
        Ok(self.segments)
    }

    fn parse_spec(&mut self) -> Result<Spec, ConfigError> {
        let mut spec = Spec::default();
        if self.chars.peek() == Some(&'-') {
            self.chars.next();
            spec.left_justify = true;
        }
        spec.min_width = self.parse_width()?.unwrap_or(0);
        if self.chars.peek() == Some(&'.') {
            self.chars.next();
            spec.max_width = self.parse_width()?;
        }
        Ok(spec)
    }

    fn parse_width(&mut self) -> Result<Option<usize>, ConfigError> {
        let mut value: Option<usize> = None;
        while let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.chars.next();
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        }
        match value {
            Some(width) if width > MAX_FIELD_WIDTH => {
                Err(self.error(format!("field width {width} exceeds {MAX_FIELD_WIDTH}")))
            }
            _ => Ok(value),
        }
    }

    fn parse_option(&mut self) -> Result<Option<String>, ConfigError> {
        if self.chars.peek() != Some(&'{') {
            return Ok(None);
        }
        self.chars.next();
        let mut option = String::new();
        for ch in self.chars.by_ref() {
            if ch == '}' {
                return Ok(Some(option));
            }
            option.push(ch);
        }
        Err(self.error("unterminated '{' option"))
    }

    fn parse_conversion(&mut self) -> Result<Conversion, ConfigError> {
        let Some(ch) = self.chars.next() else {
            return Err(self.error("pattern ends with '%'"));
        };
        let conversion = match ch {
            'c' => {
                let precision = match self.parse_option()? {
                    Some(text) => Some(
                        text.trim()
                            .parse::<usize>()
                            .map_err(|_| self.error(format!("invalid logger precision '{text}'")))?,
                    ),
                    None => None,
                };
                Conversion::Logger(precision)
            }
            'p' => Conversion::Level,
            'm' => Conversion::Message,
            'n' => Conversion::Newline,
            'F' => Conversion::File,
            'L' => Conversion::Line,
            'M' => Conversion::Module,
            'l' => Conversion::Location,
            't' => Conversion::Thread,
            'X' => Conversion::Mdc(self.parse_option()?),
            other => return Err(self.error(format!("unknown conversion '%{other}'"))),
        };
        Ok(conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::location::Location;
    use std::collections::BTreeMap;

    fn record<'a>(logger: &'a str, message: &'a str, location: &'a Location) -> Record<'a> {
        Record::new(logger, Level::Info, message, location).with_mdc(BTreeMap::new())
    }

    fn render_with(pattern: &str, record: &Record<'_>) -> String {
        Layout::pattern(pattern).expect("pattern compiles").format(record)
    }

    #[test]
    fn simple_layout_renders_level_and_message() {
        let location = Location::default();
        let record = record("app", "This is INFO", &location);
        assert_eq!(Layout::Simple.format(&record), "INFO - This is INFO\n");
    }

    #[test]
    fn fallback_pattern_names_root() {
        let location = Location::default();
        let record = record("", "ready", &location);
        assert_eq!(render_with("%c %p: %m%n", &record), "root INFO: ready\n");
    }

    #[test]
    fn padding_and_justification() {
        let location = Location::default();
        let record = record("compY", "msg", &location);
        assert_eq!(render_with("%-5p %c - %m%n", &record), "INFO  compY - msg\n");
        assert_eq!(render_with("[%6p]", &record), "[  INFO]");
    }

    #[test]
    fn max_width_keeps_rightmost_characters() {
        let location = Location::default();
        let record = record("alpha.beta.gamma", "m", &location);
        assert_eq!(render_with("%.5c", &record), "gamma");
    }

    #[test]
    fn logger_precision_keeps_last_components() {
        let location = Location::default();
        let record = record("main.task.subtask", "m", &location);
        assert_eq!(render_with("%c{1}", &record), "subtask");
        assert_eq!(render_with("%c{2}", &record), "task.subtask");
        assert_eq!(render_with("%c{9}", &record), "main.task.subtask");
    }

    #[test]
    fn location_conversions() {
        let location = Location::new("tests/log.rs", 12, "crate::tests");
        let record = record("x", "m", &location);
        assert_eq!(
            render_with("%F:%L %M %l", &record),
            "tests/log.rs:12 crate::tests tests/log.rs(12)"
        );
    }

    #[test]
    fn mdc_conversions() {
        let location = Location::default();
        let mut mdc = BTreeMap::new();
        mdc.insert("y".to_owned(), "foo".to_owned());
        mdc.insert("x".to_owned(), "3".to_owned());
        let record = record("", "m", &location).with_mdc(mdc);
        assert_eq!(render_with("%X", &record), "{{x,3}{y,foo}}");
        assert_eq!(render_with("%X{y}|%X{z}|", &record), "foo||");

        let empty = Record::new("", Level::Info, "m", &location).with_mdc(BTreeMap::new());
        assert_eq!(render_with("%X", &empty), "{}");
    }

    #[test]
    fn percent_escape_is_literal() {
        let location = Location::default();
        let record = record("", "50", &location);
        assert_eq!(render_with("%m%%", &record), "50%");
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(
            Layout::pattern("%q"),
            Err(ConfigError::InvalidPattern { .. })
        ));
        assert!(Layout::pattern("trailing %").is_err());
        assert!(Layout::pattern("%X{open").is_err());
        assert!(Layout::pattern("%c{x}").is_err());
    }

    #[test]
    fn oversized_widths_are_rejected_at_compile_time() {
        for pattern in ["%99999999999999999999m", "%4097p", "%-5.4097c"] {
            assert!(
                matches!(Layout::pattern(pattern), Err(ConfigError::InvalidPattern { .. })),
                "{pattern} should be rejected"
            );
        }
        let location = Location::default();
        let record = record("", "m", &location);
        let widest = render_with("%4096m", &record);
        assert_eq!(widest.len(), MAX_FIELD_WIDTH);
        assert!(widest.ends_with('m'));
    }

    #[test]
    fn pattern_text_is_preserved() {
        let layout = PatternLayout::new("%m%n").unwrap();
        assert_eq!(layout.pattern(), "%m%n");
    }
}
