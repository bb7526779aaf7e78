//! crates/logging/src/message.rs
//! Bounded message rendering.
//!
//! Formatted messages are capped at [`MAX_LOG_MSG_LEN`] bytes. Longer output
//! is cut at the last UTF-8 character boundary that fits and the remaining
//! arguments are not formatted at all. Truncation is silent.

use std::fmt::{self, Write};

/// Upper bound, in bytes, of a message rendered by [`Logger::log`](crate::Logger::log).
pub const MAX_LOG_MSG_LEN: usize = 1024;

struct BoundedBuffer {
    text: String,
    limit: usize,
    truncated: bool,
}

impl Write for BoundedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.push_str(&s[..cut]);
        self.truncated = true;
        // Stops the formatting machinery; the caller treats it as truncation.
        Err(fmt::Error)
    }
}

/// Renders `args`, keeping at most `limit` bytes.
///
/// Returns the text and whether it was truncated.
pub fn format_bounded_with_limit(args: fmt::Arguments<'_>, limit: usize) -> (String, bool) {
    if let Some(literal) = args.as_str() {
        if literal.len() <= limit {
            return (literal.to_owned(), false);
        }
    }
    let mut buffer = BoundedBuffer {
        text: String::with_capacity(limit.min(256)),
        limit,
        truncated: false,
    };
    // A Display impl may also fail on its own; keep what it produced.
    let _ = buffer.write_fmt(args);
    (buffer.text, buffer.truncated)
}

/// Renders `args` into at most [`MAX_LOG_MSG_LEN`] bytes.
pub fn format_bounded(args: fmt::Arguments<'_>) -> String {
    format_bounded_with_limit(args, MAX_LOG_MSG_LEN).0
}
