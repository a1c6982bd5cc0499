#![warn(missing_docs)]

//! Marker-delimited section rewriting
//!
//! Regenerates delimited blocks of machine-written code inside an otherwise
//! hand-maintained source file. A section is the run of lines strictly between
//! a begin marker line and an end marker line; rewriting replaces that run and
//! nothing else.

pub mod document;
pub mod error;
pub mod markers;
pub mod plan;
pub mod rewriter;

// Re-export public API
pub use document::{Document, SectionSpan};
pub use error::{Result, SectionError};
pub use markers::MarkerPair;
pub use plan::{RewritePlan, SectionEdit};
pub use rewriter::{rewrite, SectionRewriter};
