use std::path::{Path, PathBuf};

use crate::CheckArgs;
use crate::finder::FinderError;

/// Validate every Markdown file under the template root without rendering.
///
/// Pages missing `wrapper_template` are counted as skipped, not failed:
/// that is the normal shape of an include fragment, and such files are
/// simply not routable. Everything else (unparsable front matter, unloaded
/// wrapper, broken includes) is a problem.
pub fn run(args: &CheckArgs) -> Result<(), anyhow::Error> {
    let (_config, _base_path, finder, _base) = super::setup(args.config_file.as_deref())?;

    let mut pages = Vec::new();
    collect_markdown_files(finder.root(), Path::new(""), &mut pages)?;

    let mut skipped = 0usize;
    let mut problems = 0usize;

    for page in &pages {
        match finder.check_page(page) {
            Ok(()) => {}
            Err(FinderError::MissingWrapper { .. }) => {
                tracing::debug!(page = %page.display(), "no wrapper_template, not a routable page");
                skipped += 1;
            }
            Err(error) => {
                problems += 1;
                eprintln!("{}: {}", page.display(), error);
            }
        }
    }

    println!(
        "Checked {} markdown files: {} ok, {} skipped, {} problem(s)",
        pages.len(),
        pages.len() - skipped - problems,
        skipped,
        problems
    );

    if problems > 0 {
        anyhow::bail!("{} page(s) failed validation", problems);
    }
    Ok(())
}

/// Recursively collect root-relative paths of Markdown files.
fn collect_markdown_files(
    dir: &Path,
    relative: &Path,
    pages: &mut Vec<PathBuf>,
) -> Result<(), std::io::Error> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name_str = file_name.to_string_lossy();

        // Skip hidden files and directories
        if file_name_str.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let entry_relative = relative.join(&file_name);

        if path.is_dir() {
            if matches!(file_name_str.as_ref(), "node_modules" | "target") {
                continue;
            }
            collect_markdown_files(&path, &entry_relative, pages)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            pages.push(entry_relative);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_markdown_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/.hidden")).unwrap();
        std::fs::write(dir.path().join("index.md"), "").unwrap();
        std::fs::write(dir.path().join("docs/page.md"), "").unwrap();
        std::fs::write(dir.path().join("docs/.hidden/skip.md"), "").unwrap();
        std::fs::write(dir.path().join("docs/style.css"), "").unwrap();

        let mut pages = Vec::new();
        collect_markdown_files(dir.path(), Path::new(""), &mut pages).unwrap();
        pages.sort();

        assert_eq!(
            pages,
            vec![PathBuf::from("docs/page.md"), PathBuf::from("index.md")]
        );
    }
}
