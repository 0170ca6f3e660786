//! Template rendering trait.

use crate::Result;
use serde_json::Value;

/// Renders named templates against a JSON context.
///
/// The context is the only untyped value crossing the rendering boundary;
/// callers build typed contexts and serialize them right before rendering.
pub trait TemplateRenderer {
    /// Renders `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TemplateError`] if the template is unknown or
    /// rendering fails.
    fn render(&self, template: &str, context: &Value) -> Result<String>;
}
