//! App-module generation
//!
//! Turns a feature-set catalog into the generated sections of an existing app
//! module. Every section is rendered from the same [`AppModuleContext`] and
//! applied to the document in configuration order; the first failure aborts
//! the run and no text is returned.

use std::collections::BTreeMap;

use appgen_sections::{RewritePlan, SectionEdit};
use serde::Serialize;
use tracing::info;

use crate::{
    config::GeneratorConfig,
    error::Result,
    feature_sets::FeatureSetCatalog,
    models::{SubsystemAccessor, SubsystemInfo},
    renderer::SectionRenderer,
};

/// Everything a section template can refer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppModuleContext {
    /// Present feature sets with a subsystem, sorted by name
    pub subsystems: Vec<SubsystemInfo>,
    /// Subsystem accessors, sorted by name
    pub accessors: Vec<SubsystemAccessor>,
    /// Subsystem names in creation order
    pub init_order: Vec<String>,
    /// Soft requirements that are not part of the project
    pub missing_soft_requirements: Vec<String>,
    /// All present feature-set names, sorted
    pub feature_sets: Vec<String>,
    /// Presence lookup by feature-set name, for `{{#if present.name}}`
    pub present: BTreeMap<String, bool>,
}

impl AppModuleContext {
    /// Collects the context for a catalog
    ///
    /// # Errors
    ///
    /// Fails if subsystem dependencies are circular.
    pub fn from_catalog(catalog: &FeatureSetCatalog) -> Result<Self> {
        let init_order = catalog.init_order()?.into_vec();
        let feature_sets: Vec<String> = catalog.names().map(str::to_string).collect();

        Ok(Self {
            subsystems: catalog.subsystems(),
            accessors: catalog.accessors(),
            init_order,
            missing_soft_requirements: catalog.missing_soft_requirements().into_iter().collect(),
            present: feature_sets.iter().map(|name| (name.clone(), true)).collect(),
            feature_sets,
        })
    }
}

/// Regenerates the configured sections of an app module
pub struct AppModuleGenerator {
    config: GeneratorConfig,
    renderer: SectionRenderer,
}

impl AppModuleGenerator {
    /// Creates a generator, validating the configuration and its templates
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let renderer = SectionRenderer::new(&config)?;
        Ok(Self { config, renderer })
    }

    /// Configuration in use
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Renders every section into a rewrite plan without touching any text
    pub fn plan(&self, catalog: &FeatureSetCatalog) -> Result<RewritePlan> {
        let context = serde_json::to_value(AppModuleContext::from_catalog(catalog)?)?;

        let mut plan = RewritePlan::new();
        for section in &self.config.sections {
            let content = self.renderer.render_block(section, &context)?;
            plan.push(
                SectionEdit::new(section.markers(&self.config.comment_prefix), content)
                    .with_keep_markers(section.keep_markers),
            );
        }
        Ok(plan)
    }

    /// Produces the new module text from the existing one
    ///
    /// Pure: reading `existing` from storage and writing the result back are
    /// left to the caller, who must discard everything on error.
    pub fn generate(&self, catalog: &FeatureSetCatalog, existing: &str) -> Result<String> {
        let plan = self.plan(catalog)?;
        let output = plan.apply_text(existing)?;

        info!(
            feature_sets = catalog.len(),
            sections = plan.len(),
            changed = output != existing,
            "Generated app module"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SectionConfig, error::GenerationError, models::FeatureSet};
    use appgen_sections::SectionError;

    const MODULE: &str = "\
class App:
    # __IMPORTS_BEGIN__
    pass
    # __IMPORTS_END__

    def create(self):
        # __CREATE_BEGIN__
        pass
        # __CREATE_END__
";

    fn catalog() -> FeatureSetCatalog {
        FeatureSetCatalog::from_feature_sets([
            FeatureSet::new("base").with_app_subsystem(),
            FeatureSet::new("ui").with_app_subsystem().with_subsystem_dependency("base"),
            FeatureSet::new("scene").with_app_subsystem().with_subsystem_dependency("ui"),
        ])
        .unwrap()
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            notice: "# generated; do not edit".to_string(),
            comment_prefix: "#".to_string(),
            sections: vec![
                SectionConfig::new("imports", "    ").with_template(
                    "{{#each subsystems}}from {{package}} import {{class_name}}\n{{/each}}",
                ),
                SectionConfig::new("create", "        ")
                    .with_template("{{#each init_order}}_ = self.{{this}}\n{{/each}}"),
            ],
        }
    }

    #[test]
    fn test_context_from_catalog() {
        let context = AppModuleContext::from_catalog(&catalog()).unwrap();
        assert_eq!(context.init_order, vec!["base", "ui", "scene"]);
        assert_eq!(context.feature_sets, vec!["base", "scene", "ui"]);
        assert_eq!(context.present.get("ui"), Some(&true));
        assert!(context.missing_soft_requirements.is_empty());
    }

    #[test]
    fn test_generate_fills_sections() {
        let generator = AppModuleGenerator::new(config()).unwrap();
        let out = generator.generate(&catalog(), MODULE).unwrap();

        let expected = "\
class App:
    # __IMPORTS_BEGIN__
    # generated; do not edit

    from base import BaseSubsystem
    from scene import SceneSubsystem
    from ui import UiSubsystem

    # __IMPORTS_END__

    def create(self):
        # __CREATE_BEGIN__
        # generated; do not edit

        _ = self.base
        _ = self.ui
        _ = self.scene

        # __CREATE_END__
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_generate_is_stable() {
        let generator = AppModuleGenerator::new(config()).unwrap();
        let once = generator.generate(&catalog(), MODULE).unwrap();
        let twice = generator.generate(&catalog(), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_section_aborts() {
        let generator = AppModuleGenerator::new(config()).unwrap();
        let module = MODULE.replace("        # __CREATE_END__\n", "");

        let err = generator.generate(&catalog(), &module).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Section(SectionError::MarkerNotFound { .. })
        ));
    }

    #[test]
    fn test_cycle_aborts_before_rendering() {
        let generator = AppModuleGenerator::new(config()).unwrap();
        let catalog = FeatureSetCatalog::from_feature_sets([
            FeatureSet::new("a").with_app_subsystem().with_subsystem_dependency("b"),
            FeatureSet::new("b").with_app_subsystem().with_subsystem_dependency("a"),
        ])
        .unwrap();

        let err = generator.generate(&catalog, MODULE).unwrap_err();
        assert!(matches!(err, GenerationError::Ordering(_)));
    }

    #[test]
    fn test_plan_has_one_edit_per_section() {
        let generator = AppModuleGenerator::new(config()).unwrap();
        let plan = generator.plan(&catalog()).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(
            plan.edits()[0].markers.begin(),
            "    # __IMPORTS_BEGIN__\n"
        );
    }
}
