//! Section content rendering
//!
//! Each configured section carries a handlebars template. Rendering turns it
//! into the text spliced between the section's markers: the notice line, a
//! blank line, the rendered body, everything indented to the section's depth.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use tracing::debug;

use crate::{
    config::{GeneratorConfig, SectionConfig},
    error::{GenerationError, Result},
};

/// Renders section templates against an app-module context
pub struct SectionRenderer {
    registry: Handlebars<'static>,
    notice: String,
}

impl SectionRenderer {
    /// Compiles the template of every configured section
    ///
    /// # Errors
    ///
    /// [`GenerationError::Template`] naming the first section whose template
    /// does not parse.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);

        for section in &config.sections {
            registry
                .register_template_string(&section.name, &section.template)
                .map_err(|e| GenerationError::Template {
                    section: section.name.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            registry,
            notice: config.notice.clone(),
        })
    }

    /// Renders the bare template output for a section
    pub fn render_body<T: Serialize>(&self, section: &str, context: &T) -> Result<String> {
        if !self.registry.has_template(section) {
            return Err(GenerationError::UnknownSection(section.to_string()));
        }

        self.registry
            .render(section, context)
            .map_err(|e| GenerationError::Render {
                section: section.to_string(),
                message: e.to_string(),
            })
    }

    /// Renders the full block for a section, notice and indentation included
    pub fn render_block<T: Serialize>(
        &self,
        section: &SectionConfig,
        context: &T,
    ) -> Result<String> {
        let body = self.render_body(&section.name, context)?;
        let block = compose_block(&self.notice, &body, &section.indent);
        debug!(section = %section.name, bytes = block.len(), "Rendered section");
        Ok(block)
    }
}

/// Assembles a generated block
///
/// The notice comes first; a non-blank body follows after an empty line. The
/// result always ends with a newline and every non-blank line is prefixed
/// with `indent`.
pub fn compose_block(notice: &str, body: &str, indent: &str) -> String {
    let text = if body.trim().is_empty() {
        format!("{notice}\n")
    } else {
        format!("{notice}\n\n{body}\n")
    };
    indent_lines(&text, indent)
}

/// Prefixes every line that has non-whitespace content with `indent`
pub fn indent_lines(text: &str, indent: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect()
}
