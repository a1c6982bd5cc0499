#![warn(missing_docs)]

//! App-module generation from feature-set metadata
//!
//! Ties section rewriting and init ordering together: a catalog of feature
//! sets is analysed for soft requirements and subsystem order, every
//! configured section is rendered from a handlebars template, and the results
//! are spliced into the existing module text in one pass.
//!
//! ```
//! use appgen_generation::{
//!     AppModuleGenerator, FeatureSet, FeatureSetCatalog, GeneratorConfig, SectionConfig,
//! };
//!
//! let config = GeneratorConfig {
//!     sections: vec![SectionConfig::new("create", "    ")
//!         .with_template("{{#each init_order}}self.{{this}}\n{{/each}}")],
//!     ..GeneratorConfig::default()
//! };
//! let catalog = FeatureSetCatalog::from_feature_sets([
//!     FeatureSet::new("ui").with_app_subsystem().with_subsystem_dependency("base"),
//!     FeatureSet::new("base").with_app_subsystem(),
//! ])
//! .unwrap();
//!
//! let module = "def create():\n    # __CREATE_BEGIN__\n    pass\n    # __CREATE_END__\n";
//! let out = AppModuleGenerator::new(config).unwrap().generate(&catalog, module).unwrap();
//! assert!(out.contains("    self.base\n    self.ui\n"));
//! ```

pub mod config;
pub mod error;
pub mod feature_sets;
pub mod generator;
pub mod models;
pub mod registry;
pub mod renderer;

// Re-export public API
pub use config::{GeneratorConfig, SectionConfig, ENV_PREFIX};
pub use error::{GenerationError, Result};
pub use feature_sets::FeatureSetCatalog;
pub use generator::{AppModuleContext, AppModuleGenerator};
pub use models::{AccessorKind, FeatureSet, SubsystemAccessor, SubsystemInfo};
pub use registry::{RegistryError, RegistryResult, SubsystemRegistry};
pub use renderer::{compose_block, indent_lines, SectionRenderer};
