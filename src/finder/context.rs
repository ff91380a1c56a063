//! Render context assembly.
//!
//! The final context is built by inserting, in order of increasing
//! precedence: the base context, the front matter's `context` entries, the
//! rendered body as `html_content`, and the expanded includes. Later
//! inserts overwrite earlier keys, so an include named `title` beats
//! `context.title`, and an include named `html_content` replaces the body.

use std::collections::BTreeMap;

use tera::Context;

use super::front_matter::FrontMatter;

/// Key under which the rendered page body lands in the context.
pub const BODY_KEY: &str = "html_content";

/// Merge everything a wrapper template needs into one context.
pub fn assemble(
    base: &Context,
    front_matter: &FrontMatter,
    body_html: &str,
    includes: &BTreeMap<String, String>,
) -> Context {
    let mut context = base.clone();

    for (key, value) in &front_matter.context {
        context.insert(key.as_str(), value);
    }

    context.insert(BODY_KEY, body_html);

    for (key, html) in includes {
        context.insert(key.as_str(), html);
    }

    context
}
