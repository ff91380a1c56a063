//! Recursive expansion of `markdown_includes` fragments.
//!
//! Each fragment is read from the template root, stripped of any front
//! matter of its own (a fragment's `wrapper_template` is ignored), rendered
//! to HTML, and stored under its include name. Fragments may declare
//! further `markdown_includes`; nested results are expanded into the same
//! flat map before the parent entry, so the outermost definition of a name
//! wins.
//!
//! The chain of files currently being expanded doubles as a visited set:
//! re-entering a file on the chain is a cycle, and a chain longer than
//! [`MAX_INCLUDE_DEPTH`] is cut off. Both are hard errors rather than silent
//! truncation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pulldown_cmark::Options;

use super::{FinderError, front_matter, markdown, paths};

/// Hard ceiling on the include chain length (including the page itself).
pub const MAX_INCLUDE_DEPTH: usize = 8;

/// Expand an include map into rendered HTML fragments keyed by name.
pub fn expand(
    root: &Path,
    options: Options,
    includes: &BTreeMap<String, String>,
    source: &Path,
) -> Result<BTreeMap<String, String>, FinderError> {
    let mut rendered = BTreeMap::new();
    let mut chain = vec![source.to_path_buf()];
    expand_into(root, options, includes, source, &mut chain, &mut rendered)?;
    Ok(rendered)
}

fn expand_into(
    root: &Path,
    options: Options,
    includes: &BTreeMap<String, String>,
    source: &Path,
    chain: &mut Vec<PathBuf>,
    rendered: &mut BTreeMap<String, String>,
) -> Result<(), FinderError> {
    if chain.len() > MAX_INCLUDE_DEPTH {
        return Err(FinderError::IncludeDepth {
            chain: format_chain(chain),
        });
    }

    for (name, fragment) in includes {
        let fragment_rel = paths::resolve_template_path(fragment, source)?;

        if chain.contains(&fragment_rel) {
            return Err(FinderError::IncludeCycle {
                path: fragment_rel,
                chain: format_chain(chain),
            });
        }

        let raw =
            std::fs::read_to_string(root.join(&fragment_rel)).map_err(|_| {
                FinderError::IncludeMissing {
                    name: name.clone(),
                    path: fragment.clone(),
                    includer: source.to_path_buf(),
                }
            })?;

        let parsed = front_matter::parse_front_matter(&raw).map_err(|e| {
            FinderError::FrontMatter {
                path: fragment_rel.clone(),
                source: e,
            }
        })?;

        if !parsed.front_matter.markdown_includes.is_empty() {
            chain.push(fragment_rel.clone());
            expand_into(
                root,
                options,
                &parsed.front_matter.markdown_includes,
                &fragment_rel,
                chain,
                rendered,
            )?;
            chain.pop();
        }

        rendered.insert(name.clone(), markdown::to_html(&parsed.body, options));
    }

    Ok(())
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn includes_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_expand_simple_fragment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "includes/nav.md", "# Nav");

        let includes = includes_map(&[("nav", "includes/nav.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        )
        .unwrap();

        assert_eq!(rendered.get("nav").unwrap().trim(), "<h1>Nav</h1>");
    }

    #[test]
    fn test_fragment_front_matter_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "nav.md",
            "---\nwrapper_template: /ignored.html\n---\n\n**bold**",
        );

        let includes = includes_map(&[("nav", "nav.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        )
        .unwrap();

        let html = rendered.get("nav").unwrap();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("wrapper_template"));
    }

    #[test]
    fn test_relative_resolution_from_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/partials/footer.md", "footer text");

        let includes = includes_map(&[("footer", "partials/footer.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("docs/index.md"),
        )
        .unwrap();

        assert!(rendered.get("footer").unwrap().contains("footer text"));
    }

    #[test]
    fn test_rooted_fragment_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shared/nav.md", "nav text");

        let includes = includes_map(&[("nav", "/shared/nav.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("docs/deep/page.md"),
        )
        .unwrap();

        assert!(rendered.get("nav").unwrap().contains("nav text"));
    }

    #[test]
    fn test_missing_fragment() {
        let dir = tempfile::tempdir().unwrap();

        let includes = includes_map(&[("nav", "missing.md")]);
        let result = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        );

        match result {
            Err(FinderError::IncludeMissing { name, path, includer }) => {
                assert_eq!(name, "nav");
                assert_eq!(path, "missing.md");
                assert_eq!(includer, PathBuf::from("index.md"));
            }
            other => panic!("expected IncludeMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_includes_flatten() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "outer.md",
            "---\nmarkdown_includes:\n  inner: inner.md\n---\nouter body",
        );
        write(dir.path(), "inner.md", "inner body");

        let includes = includes_map(&[("outer", "outer.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        )
        .unwrap();

        assert!(rendered.get("outer").unwrap().contains("outer body"));
        assert!(rendered.get("inner").unwrap().contains("inner body"));
    }

    #[test]
    fn test_outermost_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "outer.md",
            "---\nmarkdown_includes:\n  outer: shadow.md\n---\nouter body",
        );
        write(dir.path(), "shadow.md", "shadow body");

        let includes = includes_map(&[("outer", "outer.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        )
        .unwrap();

        // The page-level "outer" entry overwrites the nested one
        assert!(rendered.get("outer").unwrap().contains("outer body"));
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "body");

        let includes = includes_map(&[("me", "index.md")]);
        let result = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        );

        assert!(matches!(result, Err(FinderError::IncludeCycle { .. })));
    }

    #[test]
    fn test_mutual_include_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a.md",
            "---\nmarkdown_includes:\n  b: b.md\n---\na body",
        );
        write(
            dir.path(),
            "b.md",
            "---\nmarkdown_includes:\n  a: a.md\n---\nb body",
        );

        let includes = includes_map(&[("a", "a.md")]);
        let result = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        );

        match result {
            Err(FinderError::IncludeCycle { path, chain }) => {
                assert_eq!(path, PathBuf::from("a.md"));
                assert!(chain.contains("a.md"));
                assert!(chain.contains("b.md"));
            }
            other => panic!("expected IncludeCycle, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=MAX_INCLUDE_DEPTH {
            write(
                dir.path(),
                &format!("f{}.md", i),
                &format!("---\nmarkdown_includes:\n  next: f{}.md\n---\nbody", i + 1),
            );
        }

        let includes = includes_map(&[("next", "f1.md")]);
        let result = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        );

        assert!(matches!(result, Err(FinderError::IncludeDepth { .. })));
    }

    #[test]
    fn test_shared_fragment_is_not_a_false_cycle() {
        // Two siblings including the same fragment is fine
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shared.md", "shared body");

        let includes = includes_map(&[("one", "shared.md"), ("two", "shared.md")]);
        let rendered = expand(
            dir.path(),
            Options::empty(),
            &includes,
            Path::new("index.md"),
        )
        .unwrap();

        assert!(rendered.get("one").unwrap().contains("shared body"));
        assert!(rendered.get("two").unwrap().contains("shared body"));
    }
}
