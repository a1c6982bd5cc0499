//! Ordered-line document model
//!
//! A [`Document`] is the text being regenerated, held as a sequence of lines.
//! Every line keeps its original terminator so that converting back to text is
//! byte-for-byte faithful, including a final line without a newline.

use std::fmt;
use std::ops::Range;

use crate::{
    error::{Result, SectionError},
    markers::{strip_terminator, MarkerPair},
};

/// Immutable ordered sequence of text lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

/// Location of a section inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    /// Index of the begin marker line
    pub begin: usize,
    /// Index of the end marker line
    pub end: usize,
}

impl SectionSpan {
    /// Line indices strictly between the two markers
    pub fn content_range(&self) -> Range<usize> {
        self.begin + 1..self.end
    }

    /// Number of lines currently held by the section
    pub fn content_len(&self) -> usize {
        self.end - self.begin - 1
    }
}

impl Document {
    /// Splits text into lines, keeping each line's terminator
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Builds a document from bare lines, terminating each with `\n`
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| format!("{}\n", strip_terminator(line.as_ref())))
                .collect(),
        }
    }

    /// Joins the lines back into a single string
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document holds no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, terminator included
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Iterates over the lines, terminators included
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Index of the first line at or after `from` that equals `marker`
    pub fn find_line(&self, marker: &str, from: usize) -> Option<usize> {
        let wanted = strip_terminator(marker);
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| strip_terminator(line) == wanted)
            .map(|(index, _)| index)
    }

    /// Locates the first section bracketed by `markers`
    ///
    /// # Errors
    ///
    /// [`SectionError::MarkerNotFound`] when either marker is missing, and
    /// [`SectionError::MarkerOrder`] when the end marker only occurs at or
    /// before the begin marker, or directly follows it with no lines between.
    pub fn find_section(&self, markers: &MarkerPair) -> Result<SectionSpan> {
        let begin = self
            .find_line(markers.begin(), 0)
            .ok_or_else(|| SectionError::not_found(markers.begin()))?;

        match self.find_line(markers.end(), begin + 1) {
            Some(end) if end == begin + 1 => Err(SectionError::order(
                markers.begin(),
                markers.end(),
                format!("no lines between markers (line {})", begin + 1),
            )),
            Some(end) => Ok(SectionSpan { begin, end }),
            None => match self.find_line(markers.end(), 0) {
                Some(end) => Err(SectionError::order(
                    markers.begin(),
                    markers.end(),
                    format!(
                        "end marker at line {} does not follow begin marker at line {}",
                        end + 1,
                        begin + 1
                    ),
                )),
                None => Err(SectionError::not_found(markers.end())),
            },
        }
    }

    /// Current text strictly between the markers
    pub fn section_content(&self, markers: &MarkerPair) -> Result<String> {
        let span = self.find_section(markers)?;
        Ok(self.lines[span.content_range()].concat())
    }

    /// Replaces the lines of `span` with `content`, producing a new document
    pub(crate) fn splice(&self, span: SectionSpan, content: &str, keep_markers: bool) -> Self {
        let (head_end, tail_start) = if keep_markers {
            (span.begin + 1, span.end)
        } else {
            (span.begin, span.end + 1)
        };

        let mut text = self.lines[..head_end].concat();
        text.push_str(content);
        if !content.is_empty() && !content.ends_with('\n') {
            // Content ends on a line of its own and never absorbs the end marker.
            text.push_str(self.terminator_at(span.begin));
        }
        for line in &self.lines[tail_start..] {
            text.push_str(line);
        }

        Self::from_text(&text)
    }

    fn terminator_at(&self, index: usize) -> &'static str {
        match self.lines.get(index) {
            Some(line) if line.ends_with("\r\n") => "\r\n",
            _ => "\n",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> MarkerPair {
        MarkerPair::new("BEGIN\n", "END\n")
    }

    #[test]
    fn test_text_round_trip_is_exact() {
        for text in ["", "a", "a\n", "a\nb", "a\r\nb\r\n", "\n\n"] {
            assert_eq!(Document::from_text(text).to_text(), text);
        }
    }

    #[test]
    fn test_from_lines_terminates_each_line() {
        let doc = Document::from_lines(["one", "two\n"]);
        assert_eq!(doc.to_text(), "one\ntwo\n");
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_find_section_locates_span() {
        let doc = Document::from_text("X\nBEGIN\nold\nmore\nEND\nY\n");
        let span = doc.find_section(&markers()).unwrap();

        assert_eq!(span, SectionSpan { begin: 1, end: 4 });
        assert_eq!(span.content_range(), 2..4);
        assert_eq!(span.content_len(), 2);
        assert_eq!(doc.section_content(&markers()).unwrap(), "old\nmore\n");
    }

    #[test]
    fn test_missing_begin_marker() {
        let doc = Document::from_text("X\nEND\n");
        let err = doc.find_section(&markers()).unwrap_err();
        assert_eq!(
            err,
            SectionError::MarkerNotFound {
                marker: "BEGIN\n".to_string()
            }
        );
    }

    #[test]
    fn test_missing_end_marker() {
        let doc = Document::from_text("BEGIN\nold\n");
        let err = doc.find_section(&markers()).unwrap_err();
        assert!(matches!(err, SectionError::MarkerNotFound { marker } if marker == "END\n"));
    }

    #[test]
    fn test_end_before_begin_is_order_error() {
        let doc = Document::from_text("END\nold\nBEGIN\n");
        let err = doc.find_section(&markers()).unwrap_err();
        assert!(matches!(err, SectionError::MarkerOrder { .. }));
    }

    #[test]
    fn test_adjacent_markers_are_order_error() {
        let doc = Document::from_text("BEGIN\nEND\n");
        let err = doc.find_section(&markers()).unwrap_err();
        assert!(matches!(err, SectionError::MarkerOrder { .. }));
    }

    #[test]
    fn test_identical_markers_are_order_error() {
        let doc = Document::from_text("MARK\nbody\n");
        let err = doc
            .find_section(&MarkerPair::new("MARK\n", "MARK\n"))
            .unwrap_err();
        assert!(matches!(err, SectionError::MarkerOrder { .. }));
    }

    #[test]
    fn test_end_search_starts_after_begin() {
        // A stray end marker before the section must not confuse the lookup.
        let doc = Document::from_text("END\nBEGIN\nbody\nEND\n");
        let span = doc.find_section(&markers()).unwrap();
        assert_eq!(span, SectionSpan { begin: 1, end: 3 });
    }

    #[test]
    fn test_substring_matches_are_ignored() {
        let doc = Document::from_text("s = 'BEGIN'\n  BEGIN\nBEGIN\nx\nEND\n");
        let span = doc.find_section(&markers()).unwrap();
        assert_eq!(span.begin, 2);
    }
}
