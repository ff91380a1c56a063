//! Configuration loading and types for mdpages.
//!
//! Configuration lives in an optional `mdpages.yaml` next to the content.
//! Relative paths in the config (the template root, the assets directory)
//! are resolved against the config file's parent directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),

    #[error("template root does not exist: {0}")]
    TemplatesNotFound(PathBuf),
}

// =============================================================================
// Config types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Site metadata, exposed to templates as `site`
    #[serde(default)]
    pub site: SiteConfig,

    /// Directory containing templates and Markdown pages
    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    /// Markdown processing configuration
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Extra context entries available to every template
    #[serde(default)]
    pub context: HashMap<String, serde_yaml::Value>,

    /// Optional directory of static assets, served at `/static`
    #[serde(default)]
    pub assets: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            templates: default_templates(),
            markdown: MarkdownConfig::default(),
            context: HashMap::new(),
            assets: None,
        }
    }
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

/// Site-level metadata, exposed to templates as `site`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: Option<String>,
}

/// Markdown processing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    /// Enabled pulldown-cmark extensions, by name
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["tables".to_string(), "strikethrough".to_string()]
}

impl MarkdownConfig {
    /// Translate extension names into pulldown-cmark options.
    ///
    /// Validated once at startup so rendering itself is infallible.
    pub fn options(&self) -> Result<Options, ConfigError> {
        let mut options = Options::empty();
        for extension in &self.extensions {
            match extension.as_str() {
                "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
                "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
                "gfm" => options.insert(Options::ENABLE_GFM),
                "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
                "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
                "tables" => options.insert(Options::ENABLE_TABLES),
                "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
                other => return Err(ConfigError::InvalidExtension(other.to_string())),
            }
        }
        Ok(options)
    }
}

// =============================================================================
// Loading
// =============================================================================

impl Config {
    /// Load the config from the command line argument, defaulting to `mdpages.yaml`.
    ///
    /// Returns the config together with the base path (the config file's
    /// parent directory) against which relative paths are resolved. A missing
    /// config file yields the default configuration.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_file = config_file.unwrap_or(Path::new("mdpages.yaml"));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        let base_path = config_file
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if !config_file.exists() {
            return Ok((Self::default(), base_path));
        }

        let config = Self::load_from_file(&config_file)?;
        Ok((config, base_path))
    }

    /// Load the config from a file path.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve the template root against the base path and validate it exists.
    pub fn template_root(&self, base_path: &Path) -> Result<PathBuf, ConfigError> {
        let root = if self.templates.is_relative() {
            base_path.join(&self.templates)
        } else {
            self.templates.clone()
        };

        if !root.is_dir() {
            return Err(ConfigError::TemplatesNotFound(root));
        }

        Ok(root)
    }
}
