//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Render Markdown to an HTML fragment using pulldown-cmark.
///
/// Used for both page bodies and include fragments. The options come from
/// the config's extension list, validated at startup.
pub fn to_html(markdown: &str, options: Options) -> String {
    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
