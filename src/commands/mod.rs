//! CLI command implementations.

pub mod check;
pub mod render;
pub mod serve;

use std::path::{Path, PathBuf};

use tera::Context;

use crate::config::Config;
use crate::finder::Finder;
use crate::render::Renderer;

/// Load the config and construct the finder and base context shared by all
/// commands.
fn setup(config_file: Option<&Path>) -> Result<(Config, PathBuf, Finder, Context), anyhow::Error> {
    let (config, base_path) = Config::load_from_arg(config_file)?;
    let root = config.template_root(&base_path)?;

    let renderer = Renderer::new(&root)?;
    let markdown_options = config.markdown.options()?;
    let finder = Finder::new(root, renderer, markdown_options);

    let base = base_context(&config);
    Ok((config, base_path, finder, base))
}

/// The base render context: site metadata plus any global `context` entries
/// from the config. Per-request values (the path) are inserted on top.
fn base_context(config: &Config) -> Context {
    let mut context = Context::new();
    context.insert("site", &config.site);
    for (key, value) in &config.context {
        context.insert(key.as_str(), value);
    }
    context
}
