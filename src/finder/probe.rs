//! URL path probing against the template root.
//!
//! A route path `P` is checked against a fixed candidate list, first match
//! wins: `P.html`, `P/index.html`, `P.md`, `P/index.md`. The root route
//! probes `index.html` then `index.md`.
//!
//! When nothing matches exactly, [`canonical_route`] looks for a
//! case-insensitive match against the filesystem so the caller can redirect
//! to the canonical URL.

use std::path::{Path, PathBuf};

use super::FinderError;

/// What kind of template a route resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Html,
    Markdown,
}

/// The first existing candidate for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Root-relative path to the file
    pub path: PathBuf,
    pub kind: TemplateKind,
}

/// A URL path reduced to its meaningful segments.
///
/// Empty and `.` segments are dropped; `..` segments are rejected outright
/// so candidate paths can never leave the template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePath {
    segments: Vec<String>,
}

impl RoutePath {
    pub fn parse(route: &str) -> Result<Self, FinderError> {
        let mut segments = Vec::new();
        for segment in route.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(FinderError::Traversal {
                        path: route.to_string(),
                    });
                }
                other => segments.push(other.to_string()),
            }
        }
        Ok(Self { segments })
    }

    /// The root route (`/`), which has no segments.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn rel_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

/// Generate the ordered candidate list for a route.
pub fn candidates(route: &RoutePath) -> Vec<(PathBuf, TemplateKind)> {
    if route.is_root() {
        return vec![
            (PathBuf::from("index.html"), TemplateKind::Html),
            (PathBuf::from("index.md"), TemplateKind::Markdown),
        ];
    }

    let rel = route.rel_path();
    vec![
        (append_extension(&rel, "html"), TemplateKind::Html),
        (rel.join("index.html"), TemplateKind::Html),
        (append_extension(&rel, "md"), TemplateKind::Markdown),
        (rel.join("index.md"), TemplateKind::Markdown),
    ]
}

/// Append an extension without replacing an existing one
/// ("archive.tar" + "html" -> "archive.tar.html").
fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(extension);
    PathBuf::from(os)
}

/// Return the first candidate that exists under the template root.
pub fn probe(root: &Path, route: &RoutePath) -> Option<ResolvedTemplate> {
    for (path, kind) in candidates(route) {
        if root.join(&path).is_file() {
            return Some(ResolvedTemplate { path, kind });
        }
    }
    None
}

/// Find the canonical casing of a route that matched nothing exactly.
///
/// Walks the route segment by segment against directory listings, matching
/// case-insensitively. Intermediate segments must name directories; the
/// final segment may name a directory or the stem of an `.html`/`.md` file
/// (html file preferred over directory over md file, mirroring the candidate
/// order). Returns the corrected route only when it differs from the
/// requested one.
pub fn canonical_route(root: &Path, route: &RoutePath) -> Option<String> {
    let segments = route.segments();
    if segments.is_empty() {
        return None;
    }

    let mut dir = root.to_path_buf();
    let mut canonical: Vec<String> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        let corrected = if is_last {
            match_page_entry(&dir, segment)?
        } else {
            match_dir_entry(&dir, segment)?
        };
        if !is_last {
            dir.push(&corrected);
        }
        canonical.push(corrected);
    }

    let canonical_route = format!("/{}", canonical.join("/"));
    let requested = format!("/{}", segments.join("/"));
    if canonical_route == requested {
        None
    } else {
        Some(canonical_route)
    }
}

/// Directory entries as (name, is_dir), sorted by name for determinism.
fn list_entries(dir: &Path) -> Option<Vec<(String, bool)>> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut listed: Vec<(String, bool)> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_str()?.to_string();
            let is_dir = entry.file_type().ok()?.is_dir();
            Some((name, is_dir))
        })
        .collect();
    listed.sort();
    Some(listed)
}

/// Match an intermediate segment against directory names.
fn match_dir_entry(dir: &Path, segment: &str) -> Option<String> {
    let entries = list_entries(dir)?;
    entries
        .into_iter()
        .filter(|(name, is_dir)| *is_dir && name.eq_ignore_ascii_case(segment))
        .map(|(name, _)| name)
        .min_by_key(|name| name.as_str() != segment)
}

/// Match the final segment against directories and page file stems.
fn match_page_entry(dir: &Path, segment: &str) -> Option<String> {
    let entries = list_entries(dir)?;

    let mut best: Option<(u8, String)> = None;
    for (name, is_dir) in entries {
        let (rank, candidate) = if is_dir {
            if !name.eq_ignore_ascii_case(segment) {
                continue;
            }
            (1, name)
        } else {
            let Some((stem, extension)) = name.rsplit_once('.') else {
                continue;
            };
            if !stem.eq_ignore_ascii_case(segment) {
                continue;
            }
            match extension {
                "html" => (0, stem.to_string()),
                "md" => (2, stem.to_string()),
                _ => continue,
            }
        };

        // Lower rank wins; exact-case wins within a rank
        let better = match &best {
            None => true,
            Some((best_rank, best_name)) => {
                rank < *best_rank
                    || (rank == *best_rank && candidate == segment && best_name.as_str() != segment)
            }
        };
        if better {
            best = Some((rank, candidate));
        }
    }

    best.map(|(_, name)| name)
}
