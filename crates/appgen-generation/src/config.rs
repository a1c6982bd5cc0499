//! Generator configuration
//!
//! Declares which sections of the app module are regenerated, the marker
//! lines that bracket them, and the template that produces their content.
//! Loaded from an optional TOML file with `APPGEN_*` environment overrides.

use std::collections::HashSet;
use std::path::Path;

use appgen_sections::MarkerPair;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenerationError, Result};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "APPGEN";

/// Top-level generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// "Do not edit" line placed first in every generated block
    pub notice: String,
    /// Comment leader used when building conventional marker lines
    pub comment_prefix: String,
    /// Sections to regenerate, in application order
    pub sections: Vec<SectionConfig>,
}

/// One regenerated section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Section name; also the template name
    pub name: String,
    /// Indentation applied to markers and generated lines
    #[serde(default)]
    pub indent: String,
    /// Explicit begin marker line; derived from the name when absent
    #[serde(default)]
    pub begin: Option<String>,
    /// Explicit end marker line; derived from the name when absent
    #[serde(default)]
    pub end: Option<String>,
    /// Handlebars template rendered against the app-module context
    #[serde(default)]
    pub template: String,
    /// Whether marker lines survive regeneration
    #[serde(default = "default_keep_markers")]
    pub keep_markers: bool,
}

fn default_keep_markers() -> bool {
    true
}

impl SectionConfig {
    /// Creates a section with conventional markers and an empty template
    pub fn new(name: impl Into<String>, indent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indent: indent.into(),
            begin: None,
            end: None,
            template: String::new(),
            keep_markers: true,
        }
    }

    /// Sets the template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Sets explicit marker lines
    pub fn with_markers(mut self, begin: impl Into<String>, end: impl Into<String>) -> Self {
        self.begin = Some(begin.into());
        self.end = Some(end.into());
        self
    }

    /// Marker lines bracketing this section
    pub fn markers(&self, comment_prefix: &str) -> MarkerPair {
        let conventional = MarkerPair::for_section(&self.name, &self.indent, comment_prefix);
        MarkerPair::new(
            self.begin.clone().unwrap_or_else(|| conventional.begin().to_string()),
            self.end.clone().unwrap_or_else(|| conventional.end().to_string()),
        )
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            notice: "# This section generated by appgen; do not edit.".to_string(),
            comment_prefix: "#".to_string(),
            sections: vec![
                SectionConfig::new("featureset_app_subsystem_imports", "    "),
                SectionConfig::new("featureset_app_subsystem_properties", "    "),
                SectionConfig::new("featureset_app_subsystem_create", "        "),
                SectionConfig::new("default_app_mode_selection", "            "),
            ],
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from an optional file plus environment overrides
    ///
    /// A missing file is not an error; defaults fill whatever the sources
    /// leave unset.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        debug!(path = %path.display(), sections = loaded.sections.len(), "Loaded generator config");
        Ok(loaded)
    }

    /// Parses configuration from a TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Section named `name`
    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Sets the template of an existing section
    ///
    /// # Errors
    ///
    /// [`GenerationError::UnknownSection`] if no section has that name.
    pub fn set_template(&mut self, name: &str, template: impl Into<String>) -> Result<()> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| GenerationError::UnknownSection(name.to_string()))?;
        section.template = template.into();
        Ok(())
    }

    /// Checks that sections are named and do not share names or markers
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut markers = HashSet::new();

        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Err(GenerationError::Config(
                    "Section name must not be empty".to_string(),
                ));
            }
            if !names.insert(section.name.as_str()) {
                return Err(GenerationError::Config(format!(
                    "Section '{}' is defined more than once",
                    section.name
                )));
            }

            let pair = section.markers(&self.comment_prefix);
            for marker in [pair.begin(), pair.end()] {
                let key = marker.trim_end_matches(['\r', '\n']).to_string();
                if key.trim().is_empty() {
                    return Err(GenerationError::Config(format!(
                        "Section '{}' has an empty marker",
                        section.name
                    )));
                }
                if !markers.insert(key) {
                    return Err(GenerationError::Config(format!(
                        "Section '{}' reuses marker {:?}",
                        section.name, marker
                    )));
                }
            }
        }
        Ok(())
    }
}
