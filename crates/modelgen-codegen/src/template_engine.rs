//! Template engine for Java source generation using Handlebars.
//!
//! Templates are compiled into the binary. Output is not HTML-escaped;
//! string literals go through the `java_string` helper instead.
//!
//! # Examples
//!
//! ```
//! use modelgen_codegen::template_engine::{TemplateEngine, INTERFACE_TEMPLATE};
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let context = json!({
//!     "package": "com.acme",
//!     "entity_name": "defect",
//!     "interface_name": "DefectEntity",
//!     "super_interface": "WorkItemEntity",
//! });
//! let source = engine.render(INTERFACE_TEMPLATE, &context).unwrap();
//! assert!(source.contains("public interface DefectEntity extends WorkItemEntity"));
//! ```

use crate::naming::java_string_literal;
use handlebars::{Handlebars, handlebars_helper, no_escape};
use modelgen_core::traits::TemplateRenderer;
use modelgen_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Entity model class template.
pub const MODEL_TEMPLATE: &str = "model/entity_model";
/// Entity interface template.
pub const INTERFACE_TEMPLATE: &str = "model/entity";
/// Entity list accessor template.
pub const ENTITY_LIST_TEMPLATE: &str = "entities/entity_list";
/// List enumeration template.
pub const LIST_TEMPLATE: &str = "enums/list";
/// Phases class template.
pub const PHASES_TEMPLATE: &str = "enums/phases";

const TEMPLATES: &[(&str, &str)] = &[
    (MODEL_TEMPLATE, include_str!("../templates/model/EntityModel.java.hbs")),
    (INTERFACE_TEMPLATE, include_str!("../templates/model/Entity.java.hbs")),
    (ENTITY_LIST_TEMPLATE, include_str!("../templates/entities/EntityList.java.hbs")),
    (LIST_TEMPLATE, include_str!("../templates/enums/List.java.hbs")),
    (PHASES_TEMPLATE, include_str!("../templates/enums/Phases.java.hbs")),
];

handlebars_helper!(java_string: |raw: str| java_string_literal(raw));

/// Handlebars wrapper with the built-in Java templates registered.
///
/// This type is `Send` and `Sync`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates an engine with all built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to
    /// parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("java_string", Box::new(java_string));

        for (name, source) in TEMPLATES {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| Error::TemplateError {
                    template: (*name).to_string(),
                    message: format!("failed to register template: {e}"),
                })?;
        }

        Ok(Self { handlebars })
    }

    /// Renders a template with a serializable context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is not registered,
    /// a variable is missing or rendering fails.
    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template, context)
            .map_err(|e| Error::TemplateError {
                template: template.to_string(),
                message: e.to_string(),
            })
    }

    /// Registers an additional template, replacing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_codegen::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new().unwrap();
    /// engine.register_template_string("custom", "// {{name}}").unwrap();
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: format!("failed to register template: {e}"),
            })
    }
}

impl TemplateRenderer for TemplateEngine<'_> {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        Self::render(self, template, context)
    }
}
