//! Front matter parsing for Markdown pages.
//!
//! Front matter is a YAML block delimited by `---` at the start of the file:
//!
//! ```markdown
//! ---
//! wrapper_template: /base.html
//! context:
//!   title: My Page
//! markdown_includes:
//!   nav: includes/nav.md
//! ---
//!
//! # Content starts here
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// Metadata parsed from a page's front matter block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    /// Template that wraps the rendered body. Mandatory for routed Markdown
    /// pages; ignored on included fragments.
    pub wrapper_template: Option<String>,

    /// Extra entries merged into the render context.
    #[serde(default)]
    pub context: HashMap<String, serde_yaml::Value>,

    /// Named Markdown fragments whose rendered HTML is added to the context.
    #[serde(default)]
    pub markdown_includes: BTreeMap<String, String>,

    /// Unrecognized keys. Preserved so they are not an error, but unused.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Result of splitting front matter from Markdown content.
#[derive(Debug)]
pub struct ParsedPage {
    /// The parsed front matter (empty if none found)
    pub front_matter: FrontMatter,
    /// The Markdown content without the front matter block
    pub body: String,
}

/// Split a delimited front matter block from Markdown content.
///
/// A file without an opening `---` at the start (leading whitespace
/// tolerated), or without a matching closing delimiter, has empty front
/// matter and is all body. Malformed YAML between the delimiters is an
/// error; the caller attaches the offending file path.
pub fn parse_front_matter(content: &str) -> Result<ParsedPage, serde_yaml::Error> {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return Ok(ParsedPage {
            front_matter: FrontMatter::default(),
            body: content.to_string(),
        });
    }

    // Find the closing delimiter
    let after_opening = &content[3..];
    let Some(closing_pos) = after_opening.find("\n---") else {
        // No closing delimiter, treat the entire content as markdown
        return Ok(ParsedPage {
            front_matter: FrontMatter::default(),
            body: content.to_string(),
        });
    };

    // Extract the YAML content (skip the opening newline if present)
    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    // Extract the markdown content (skip the closing delimiter and newline)
    let body_start = 3 + closing_pos + 4; // "---" + yaml + "\n---"
    let body = if body_start < content.len() {
        content[body_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    // An empty block is valid and means no metadata
    let front_matter = if yaml_content.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml_content)?
    };

    Ok(ParsedPage { front_matter, body })
}
