//! Low-level content line output: text escaping, line folding and CRLF endings.

use chrono::{DateTime, Utc};

/// Content lines are folded once they would exceed this many octets.
const MAX_LINE_OCTETS: usize = 75;

/// Escape a TEXT value (RFC 5545 section 3.3.11).
///
/// Backslash, semicolon and comma get a leading backslash, line breaks
/// become a literal `\n`.
pub(super) fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            _ => escaped.push(c),
        }
    }

    escaped
}

/// UTC date-time in the `19980119T070000Z` form.
pub(super) fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Accumulates an iCalendar document line by line.
#[derive(Debug, Default)]
pub(super) struct IcsWriter {
    out: String,
}

impl IcsWriter {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn begin(&mut self, component: &str) {
        self.line("BEGIN", component);
    }

    pub(super) fn end(&mut self, component: &str) {
        self.line("END", component);
    }

    /// Write a property whose value is already in its wire form.
    pub(super) fn property(&mut self, name: &str, value: &str) {
        self.line(name, value);
    }

    /// Write a TEXT property, escaping the value.
    pub(super) fn text(&mut self, name: &str, value: &str) {
        self.line(name, &escape_text(value));
    }

    pub(super) fn date_time(&mut self, name: &str, value: &DateTime<Utc>) {
        self.line(name, &format_date_time(value));
    }

    pub(super) fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, name: &str, value: &str) {
        let mut width = 0;
        for c in name.chars().chain(std::iter::once(':')).chain(value.chars()) {
            let len = c.len_utf8();
            if width + len > MAX_LINE_OCTETS {
                // Continuation lines start with a single space, which counts
                self.out.push_str("\r\n ");
                width = 1;
            }
            self.out.push(c);
            width += len;
        }
        self.out.push_str("\r\n");
    }
}
