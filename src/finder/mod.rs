//! URL-to-template resolution.
//!
//! The finder turns an incoming URL path into a rendered page:
//! 1. Probe the template root for a candidate file (`probe`)
//! 2. HTML templates render directly with the base context
//! 3. Markdown pages are split into front matter and body (`front_matter`)
//! 4. The front matter names a wrapper template (`paths`), contributes
//!    context entries, and may pull in named Markdown includes (`includes`)
//! 5. Everything is merged into one render context (`context`) and handed
//!    to the wrapper template
//!
//! All state is request-local; the finder itself is immutable after
//! construction and can be shared across requests.

mod context;
mod front_matter;
mod includes;
mod markdown;
mod paths;
mod probe;

pub use front_matter::{FrontMatter, ParsedPage, parse_front_matter};
pub use includes::MAX_INCLUDE_DEPTH;
pub use probe::{ResolvedTemplate, RoutePath, TemplateKind};

use std::path::{Path, PathBuf};

use pulldown_cmark::Options;
use tera::Context;

use crate::render::{RenderError, Renderer};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("no template found for {route}")]
    NotFound { route: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{path} has no wrapper_template in its front matter")]
    MissingWrapper { path: PathBuf },

    #[error("missing include '{name}' ({path}) referenced from {includer}")]
    IncludeMissing {
        name: String,
        path: String,
        includer: PathBuf,
    },

    #[error("cyclic include of {path} (chain: {chain})")]
    IncludeCycle { path: PathBuf, chain: String },

    #[error("include chain exceeds depth limit (chain: {chain})")]
    IncludeDepth { chain: String },

    #[error("path escapes the template root: {path}")]
    Traversal { path: String },

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

// =============================================================================
// Finder
// =============================================================================

/// Outcome of a successful resolution.
#[derive(Debug)]
pub enum Page {
    /// The final response body
    Rendered(String),
    /// The route exists under a different casing; redirect to it
    Redirect(String),
}

/// Resolves URL paths to rendered pages under a template root.
pub struct Finder {
    root: PathBuf,
    renderer: Renderer,
    markdown_options: Options,
}

impl Finder {
    pub fn new(root: PathBuf, renderer: Renderer, markdown_options: Options) -> Self {
        Self {
            root,
            renderer,
            markdown_options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a URL path to a page, rendering with the given base context.
    pub fn resolve(&self, route: &str, base: &Context) -> Result<Page, FinderError> {
        let route_path = RoutePath::parse(route)?;

        let Some(resolved) = probe::probe(&self.root, &route_path) else {
            if let Some(canonical) = probe::canonical_route(&self.root, &route_path) {
                tracing::debug!(route, %canonical, "redirecting to canonical casing");
                return Ok(Page::Redirect(canonical));
            }
            return Err(FinderError::NotFound {
                route: route.to_string(),
            });
        };

        tracing::debug!(route, path = %resolved.path.display(), "resolved route");

        match resolved.kind {
            TemplateKind::Html => {
                let name = paths::template_name(&resolved.path);
                let html = self.renderer.render(&name, base)?;
                Ok(Page::Rendered(html))
            }
            TemplateKind::Markdown => self.render_markdown_page(&resolved.path, base),
        }
    }

    fn render_markdown_page(&self, page_path: &Path, base: &Context) -> Result<Page, FinderError> {
        let (parsed, wrapper_rel) = self.parse_page(page_path)?;

        let body_html = markdown::to_html(&parsed.body, self.markdown_options);
        let rendered_includes = includes::expand(
            &self.root,
            self.markdown_options,
            &parsed.front_matter.markdown_includes,
            page_path,
        )?;

        let render_context =
            context::assemble(base, &parsed.front_matter, &body_html, &rendered_includes);

        let html = self
            .renderer
            .render(&paths::template_name(&wrapper_rel), &render_context)?;
        Ok(Page::Rendered(html))
    }

    /// Read and parse a Markdown page, resolving its mandatory wrapper.
    fn parse_page(&self, page_path: &Path) -> Result<(ParsedPage, PathBuf), FinderError> {
        let raw = std::fs::read_to_string(self.root.join(page_path)).map_err(|e| {
            FinderError::Io {
                path: page_path.to_path_buf(),
                source: e,
            }
        })?;

        let parsed = parse_front_matter(&raw).map_err(|e| FinderError::FrontMatter {
            path: page_path.to_path_buf(),
            source: e,
        })?;

        let Some(wrapper) = parsed.front_matter.wrapper_template.as_deref() else {
            return Err(FinderError::MissingWrapper {
                path: page_path.to_path_buf(),
            });
        };

        let wrapper_rel = paths::resolve_template_path(wrapper, page_path)?;
        Ok((parsed, wrapper_rel))
    }

    /// Validate a Markdown page without rendering it (used by `check`).
    ///
    /// Checks that the front matter parses, the wrapper template is loaded,
    /// and every include expands.
    pub fn check_page(&self, page_path: &Path) -> Result<(), FinderError> {
        let (parsed, wrapper_rel) = self.parse_page(page_path)?;

        let wrapper_name = paths::template_name(&wrapper_rel);
        if !self.renderer.has_template(&wrapper_name) {
            return Err(FinderError::Render(RenderError::Template(
                tera::Error::msg(format!("template '{}' not found", wrapper_name)),
            )));
        }

        includes::expand(
            &self.root,
            self.markdown_options,
            &parsed.front_matter.markdown_includes,
            page_path,
        )?;
        Ok(())
    }
}
