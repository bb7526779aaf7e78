//! crates/backend/src/properties.rs
//! Java-style `.properties` parsing.
//!
//! The grammar covers what logging configurations use in practice:
//!
//! - Lines starting with `#` or `!` (after leading whitespace) are comments.
//! - A key is separated from its value by `=`, `:` or whitespace. Whitespace
//!   around the separator is ignored.
//! - A line ending with an odd number of backslashes continues on the next
//!   line; leading whitespace of the continuation is dropped.
//! - `\t`, `\n`, `\r`, `\f`, `\\`, `\=`, `\:`, `\#`, `\!`, `\ ` and
//!   `\uXXXX` escapes are decoded in both keys and values.
//!
//! Later definitions of a key replace earlier ones.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::Path;

use crate::error::ConfigError;

/// Parsed key/value pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parses property text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (line, logical) in logical_lines(text) {
            let trimmed = logical.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let (key, value) = split_entry(trimmed);
            let key = unescape(key);
            if key.is_empty() {
                return Err(ConfigError::MalformedLine {
                    line,
                    text: logical,
                });
            }
            entries.insert(key, unescape(value));
        }
        Ok(Self { entries })
    }

    /// Reads and parses a property file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Value for `key`, if defined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries were defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose key starts with `prefix`, with the prefix removed.
    pub fn with_prefix<'s, 'p>(
        &'s self,
        prefix: &'p str,
    ) -> impl Iterator<Item = (&'s str, &'s str)> + use<'s, 'p> {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(move |(key, value)| (&key[prefix.len()..], value.as_str()))
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Joins continuation lines. Yields the one-based number of the first
/// physical line together with the joined text.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (index, raw) in text.lines().enumerate() {
        let piece = match pending {
            Some(_) => raw.trim_start(),
            None => raw,
        };
        let continues = ends_with_odd_backslashes(piece)
            && !is_comment(pending.as_ref().map_or(piece, |(_, text)| text.as_str()));
        let piece = if continues {
            &piece[..piece.len() - 1]
        } else {
            piece
        };
        let (start, mut joined) = pending.take().unwrap_or((index + 1, String::new()));
        joined.push_str(piece);
        if continues {
            pending = Some((start, joined));
        } else {
            lines.push((start, joined));
        }
    }
    if let Some(rest) = pending {
        lines.push(rest);
    }
    lines
}

fn is_comment(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('!')
}

fn ends_with_odd_backslashes(text: &str) -> bool {
    text.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Splits a non-comment line into raw key and raw value.
fn split_entry(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'=' | b':' => {
                return (&line[..index], line[index + 1..].trim_start());
            }
            b' ' | b'\t' | b'\x0c' => {
                let rest = line[index..].trim_start();
                let rest = rest
                    .strip_prefix('=')
                    .or_else(|| rest.strip_prefix(':'))
                    .unwrap_or(rest);
                return (&line[..index], rest.trim_start());
            }
            _ => index += 1,
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let digits: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
