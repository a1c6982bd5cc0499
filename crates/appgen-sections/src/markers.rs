//! Marker pairs that delimit generated sections

use std::fmt;

/// The begin/end marker lines bracketing one generated section
///
/// Markers are compared against whole document lines. The trailing line
/// terminator is optional on both sides, everything else (including leading
/// indentation) must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerPair {
    begin: String,
    end: String,
}

impl MarkerPair {
    /// Creates a marker pair from two literal lines
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
        }
    }

    /// Builds the conventional marker lines for a named section
    ///
    /// `for_section("featureset_imports", "    ", "#")` yields
    /// `"    # __FEATURESET_IMPORTS_BEGIN__\n"` and
    /// `"    # __FEATURESET_IMPORTS_END__\n"`.
    pub fn for_section(name: &str, indent: &str, comment_prefix: &str) -> Self {
        let tag = name.to_ascii_uppercase();
        Self {
            begin: format!("{indent}{comment_prefix} __{tag}_BEGIN__\n"),
            end: format!("{indent}{comment_prefix} __{tag}_END__\n"),
        }
    }

    /// The begin marker line, as supplied
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// The end marker line, as supplied
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Whether `line` is the begin marker
    pub fn is_begin(&self, line: &str) -> bool {
        line_matches(line, &self.begin)
    }

    /// Whether `line` is the end marker
    pub fn is_end(&self, line: &str) -> bool {
        line_matches(line, &self.end)
    }
}

impl fmt::Display for MarkerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            strip_terminator(&self.begin).trim(),
            strip_terminator(&self.end).trim()
        )
    }
}

/// Exact line equality, ignoring a single trailing `\n` or `\r\n`
pub(crate) fn line_matches(line: &str, marker: &str) -> bool {
    strip_terminator(line) == strip_terminator(marker)
}

pub(crate) fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}
