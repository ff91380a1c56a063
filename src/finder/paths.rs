//! Template path resolution for wrappers and includes.
//!
//! Front matter references other files either rooted at the template root
//! (leading `/`) or relative to the file that references them. Either way
//! the result is a normalized root-relative path that cannot point outside
//! the template root.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use super::FinderError;

/// Resolve a template path from front matter to a root-relative path.
///
/// - A leading `/` roots the path at the template root.
/// - Otherwise the path is resolved against the directory containing
///   `origin`, the (root-relative) file that referenced it.
///
/// The combined path is normalized; a path that escapes the template root
/// is rejected with [`FinderError::Traversal`].
pub fn resolve_template_path(path: &str, origin: &Path) -> Result<PathBuf, FinderError> {
    let combined = match path.strip_prefix('/') {
        Some(rooted) => PathBuf::from(rooted),
        None => origin.parent().unwrap_or(Path::new("")).join(path),
    };

    normalize(&combined).ok_or_else(|| FinderError::Traversal {
        path: path.to_string(),
    })
}

/// Collapse `.` and `..` components, refusing to climb above the root.
///
/// Returns `None` if the path pops past its first component or contains an
/// absolute component. The result contains only normal components, so
/// joining it onto the template root stays inside the root by construction.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let mut stack: Vec<OsString> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => stack.push(part.to_os_string()),
            Component::CurDir => {}
            Component::ParentDir => {
                stack.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(stack.iter().collect())
}

/// Convert a root-relative path to a template name (forward slashes).
pub fn template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_path() {
        let resolved = resolve_template_path("/base.html", Path::new("a/b/page.md")).unwrap();
        assert_eq!(resolved, PathBuf::from("base.html"));
    }

    #[test]
    fn test_relative_path_uses_origin_dir() {
        let resolved = resolve_template_path("wrapper.html", Path::new("a/b/page.md")).unwrap();
        assert_eq!(resolved, PathBuf::from("a/b/wrapper.html"));
    }

    #[test]
    fn test_relative_path_from_root_file() {
        let resolved = resolve_template_path("wrapper.html", Path::new("page.md")).unwrap();
        assert_eq!(resolved, PathBuf::from("wrapper.html"));
    }

    #[test]
    fn test_parent_components_collapse() {
        let resolved = resolve_template_path("../w.html", Path::new("a/b/page.md")).unwrap();
        assert_eq!(resolved, PathBuf::from("a/w.html"));
    }

    #[test]
    fn test_escape_is_rejected() {
        let result = resolve_template_path("../../../etc/passwd", Path::new("a/b/page.md"));
        assert!(matches!(result, Err(FinderError::Traversal { .. })));
    }

    #[test]
    fn test_rooted_escape_is_rejected() {
        let result = resolve_template_path("/../secrets.html", Path::new("page.md"));
        assert!(matches!(result, Err(FinderError::Traversal { .. })));
    }

    #[test]
    fn test_current_dir_components_dropped() {
        let resolved = resolve_template_path("./w.html", Path::new("a/page.md")).unwrap();
        assert_eq!(resolved, PathBuf::from("a/w.html"));
    }

    #[test]
    fn test_template_name_uses_forward_slashes() {
        assert_eq!(template_name(Path::new("a/b/c.html")), "a/b/c.html");
    }
}
