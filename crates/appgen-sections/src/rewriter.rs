//! Marker-delimited section rewriter
//!
//! Replaces everything strictly between a begin/end marker pair with new
//! content. Lines outside the pair, and the markers themselves when kept, are
//! carried over untouched, so hand-written code around a generated block
//! survives any number of regenerations.

use tracing::debug;

use crate::{
    document::Document,
    error::Result,
    markers::MarkerPair,
};

/// Rewrites generated sections inside a document
///
/// Stateless; every call returns a new [`Document`] and leaves its input
/// alone.
pub struct SectionRewriter;

impl SectionRewriter {
    /// Replaces the content of the first section bracketed by `markers`
    ///
    /// When `keep_markers` is false the marker lines are consumed along with
    /// the old content. The replacement is a full overwrite, so calling this
    /// again with the same `content` yields an identical document.
    ///
    /// # Errors
    ///
    /// Fails with the errors of [`Document::find_section`]; no document is
    /// produced in that case.
    pub fn rewrite(
        document: &Document,
        markers: &MarkerPair,
        content: &str,
        keep_markers: bool,
    ) -> Result<Document> {
        let span = document.find_section(markers)?;

        debug!(
            section = %markers,
            begin_line = span.begin + 1,
            end_line = span.end + 1,
            replaced_lines = span.content_len(),
            keep_markers,
            "Rewriting section"
        );

        Ok(document.splice(span, content, keep_markers))
    }
}

/// Text-level form of [`SectionRewriter::rewrite`]
///
/// ```
/// let out = appgen_sections::rewrite(
///     "X\nBEGIN\nold\nEND\nY\n",
///     "BEGIN\n",
///     "END\n",
///     "new\n",
///     true,
/// )
/// .unwrap();
/// assert_eq!(out, "X\nBEGIN\nnew\nEND\nY\n");
/// ```
pub fn rewrite(
    document: &str,
    begin_marker: &str,
    end_marker: &str,
    new_content: &str,
    keep_markers: bool,
) -> Result<String> {
    let markers = MarkerPair::new(begin_marker, end_marker);
    SectionRewriter::rewrite(&Document::from_text(document), &markers, new_content, keep_markers)
        .map(|doc| doc.to_text())
}
