use std::path::Path;

use tera::{Context, Tera};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("template root not found: {0}")]
    TemplateRootNotFound(String),
}

/// The template renderer, wrapping Tera.
///
/// All `.html` files under the template root are loaded as templates, named
/// by their root-relative path with `/` separators. Both wrapper templates
/// and directly-routed HTML pages render through here.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a new renderer loading templates from the given template root.
    pub fn new(template_root: &Path) -> Result<Self, RenderError> {
        if !template_root.is_dir() {
            return Err(RenderError::TemplateRootNotFound(
                template_root.display().to_string(),
            ));
        }

        let glob = template_root.join("**/*.html");
        let glob_str = glob.to_string_lossy();
        let tera = Tera::new(&glob_str)?;

        Ok(Self { tera })
    }

    /// Render the named template with the given context.
    pub fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        Ok(self.tera.render(template, context)?)
    }

    /// Check whether a template with the given name was loaded.
    pub fn has_template(&self, template: &str) -> bool {
        self.tera.get_template_names().any(|name| name == template)
    }
}
