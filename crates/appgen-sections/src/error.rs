//! Error types for section rewriting

use thiserror::Error;

/// Errors that can occur while locating or rewriting a marker-delimited section
///
/// Both variants mean the document and the generator have drifted out of sync.
/// They are never retried; the caller should abandon the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// A begin or end marker line does not occur in the document
    #[error("Marker not found: {marker:?}")]
    MarkerNotFound {
        /// The marker line that could not be located
        marker: String,
    },

    /// Both markers exist but do not bracket a usable section
    #[error("Malformed section between {begin:?} and {end:?}: {reason}")]
    MarkerOrder {
        /// The begin marker line
        begin: String,
        /// The end marker line
        end: String,
        /// Why the marker arrangement was rejected
        reason: String,
    },
}

impl SectionError {
    pub(crate) fn not_found(marker: &str) -> Self {
        SectionError::MarkerNotFound {
            marker: marker.to_string(),
        }
    }

    pub(crate) fn order(begin: &str, end: &str, reason: impl Into<String>) -> Self {
        SectionError::MarkerOrder {
            begin: begin.to_string(),
            end: end.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for section operations
pub type Result<T> = std::result::Result<T, SectionError>;
