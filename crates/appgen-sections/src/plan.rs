//! Sequenced application of several section rewrites
//!
//! A generation run usually refreshes more than one section of the same file.
//! A [`RewritePlan`] applies its edits in order, each one against the output of
//! the previous, and fails as a whole on the first error.

use tracing::debug;

use crate::{
    document::Document,
    error::Result,
    markers::MarkerPair,
    rewriter::SectionRewriter,
};

/// One section replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEdit {
    /// Markers bracketing the section
    pub markers: MarkerPair,
    /// Replacement text, spliced verbatim
    pub content: String,
    /// Whether the marker lines survive the rewrite
    pub keep_markers: bool,
}

impl SectionEdit {
    /// Creates an edit that keeps its markers
    pub fn new(markers: MarkerPair, content: impl Into<String>) -> Self {
        Self {
            markers,
            content: content.into(),
            keep_markers: true,
        }
    }

    /// Sets whether the marker lines are kept
    pub fn with_keep_markers(mut self, keep_markers: bool) -> Self {
        self.keep_markers = keep_markers;
        self
    }
}

/// Ordered collection of section edits for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    edits: Vec<SectionEdit>,
}

impl RewritePlan {
    /// Creates an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edit
    pub fn push(&mut self, edit: SectionEdit) {
        self.edits.push(edit);
    }

    /// Appends an edit, builder style
    pub fn with_edit(mut self, edit: SectionEdit) -> Self {
        self.push(edit);
        self
    }

    /// Number of edits
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether the plan has no edits
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits in application order
    pub fn edits(&self) -> &[SectionEdit] {
        &self.edits
    }

    /// Applies every edit in order
    ///
    /// # Errors
    ///
    /// Returns the first rewrite error. The partially rewritten document is
    /// dropped, never returned.
    pub fn apply(&self, document: &Document) -> Result<Document> {
        let mut current = document.clone();
        for (index, edit) in self.edits.iter().enumerate() {
            debug!(
                step = index + 1,
                total = self.edits.len(),
                section = %edit.markers,
                "Applying section edit"
            );
            current = SectionRewriter::rewrite(
                &current,
                &edit.markers,
                &edit.content,
                edit.keep_markers,
            )?;
        }
        Ok(current)
    }

    /// Applies every edit to raw text
    pub fn apply_text(&self, text: &str) -> Result<String> {
        self.apply(&Document::from_text(text)).map(|doc| doc.to_text())
    }
}

impl FromIterator<SectionEdit> for RewritePlan {
    fn from_iter<T: IntoIterator<Item = SectionEdit>>(iter: T) -> Self {
        Self {
            edits: iter.into_iter().collect(),
        }
    }
}
