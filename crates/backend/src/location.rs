//! crates/backend/src/location.rs
//! Source location attached to every record.

use std::fmt;

/// Call-site of a log statement.
///
/// Built by the façade's `location!` macro (file, line and module path) or by
/// [`Location::caller`] for `#[track_caller]` helpers, which cannot see the
/// module path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    file: &'static str,
    line: u32,
    module: &'static str,
}

impl Location {
    /// Creates a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, module: &'static str) -> Self {
        Self { file, line, module }
    }

    /// Location of the caller of the enclosing `#[track_caller]` function.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self::new(caller.file(), caller.line(), "")
    }

    /// Source file, empty when unknown.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Source line, zero when unknown.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Module path, empty when unknown.
    #[must_use]
    pub const fn module(&self) -> &'static str {
        self.module
    }

    /// Returns `true` when no part of the location is known.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line == 0 && self.module.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_captures_this_file() {
        let location = Location::caller();
        assert!(location.file().ends_with("location.rs"));
        assert!(location.line() > 0);
        assert_eq!(location.module(), "");
    }

    #[test]
    fn display_matches_file_line_form() {
        let location = Location::new("src/main.rs", 42, "app");
        assert_eq!(location.to_string(), "src/main.rs(42)");
    }

    #[test]
    fn default_location_is_unknown() {
        assert!(Location::default().is_unknown());
        assert!(!Location::new("a.rs", 1, "").is_unknown());
    }
}
