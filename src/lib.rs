//! Appgen
//!
//! Umbrella crate over the appgen workspace:
//!
//! - [`sections`]: marker-delimited section rewriting
//! - [`ordering`]: subsystem initialization ordering
//! - [`generation`]: feature-set analysis, templated app-module generation
//!   and the runtime subsystem registry

pub use appgen_generation as generation;
pub use appgen_ordering as ordering;
pub use appgen_sections as sections;

pub use appgen_generation::{
    AppModuleGenerator, FeatureSet, FeatureSetCatalog, GeneratorConfig, SubsystemRegistry,
};
pub use appgen_ordering::{DependencyMap, InitOrder, InitOrderResolver};
pub use appgen_sections::{rewrite, Document, MarkerPair, RewritePlan, SectionRewriter};
