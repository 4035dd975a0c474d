//! Filesystem markers and the probe that evaluates them.
//!
//! A marker is a yes/no question about the project directory. Probing is
//! best-effort: any I/O failure (missing path, permission denied, binary or
//! oversized file) answers `false` and is logged at debug level.

use std::fmt;
use std::path::{Path, PathBuf};

use globset::GlobMatcher;
use regex::Regex;
use walkdir::WalkDir;

use crate::config::ProbeConfig;
use crate::util::read_to_string_with_limit;

/// Directories never descended into by glob markers.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
    "dist",
    "build",
];

/// A filesystem predicate. Paths are relative to the probed directory.
#[derive(Debug, Clone)]
pub enum Marker {
    /// A regular file exists at the path.
    FileExists(PathBuf),
    /// A directory exists at the path.
    DirExists(PathBuf),
    /// The file at the path is readable text matching the pattern.
    FileContains { path: PathBuf, pattern: Regex },
    /// At least one file under the directory matches the glob.
    GlobMatchesAny(GlobMatcher),
    /// At least one file matching the glob is readable text matching the
    /// pattern.
    GlobContains { glob: GlobMatcher, pattern: Regex },
}

impl Marker {
    /// Short kind name, used in listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileExists(_) => "file",
            Self::DirExists(_) => "dir",
            Self::FileContains { .. } => "contains",
            Self::GlobMatchesAny(_) => "glob",
            Self::GlobContains { .. } => "glob_contains",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileExists(path) => write!(f, "file({})", path.display()),
            Self::DirExists(path) => write!(f, "dir({})", path.display()),
            Self::FileContains { path, pattern } => {
                write!(f, "contains({}, /{}/)", path.display(), pattern.as_str())
            }
            Self::GlobMatchesAny(glob) => write!(f, "glob({})", glob.glob().glob()),
            Self::GlobContains { glob, pattern } => write!(
                f,
                "glob_contains({}, /{}/)",
                glob.glob().glob(),
                pattern.as_str()
            ),
        }
    }
}

/// Evaluates markers against a directory.
///
/// Holds only the probe budget; there is no cache, so every call observes
/// the filesystem as it is at that moment.
#[derive(Debug, Clone, Default)]
pub struct MarkerProbe {
    limits: ProbeConfig,
}

impl MarkerProbe {
    /// Create a probe with the given limits.
    pub fn new(limits: ProbeConfig) -> Self {
        Self { limits }
    }

    /// Get the probe limits.
    pub fn limits(&self) -> &ProbeConfig {
        &self.limits
    }

    /// Evaluate a marker against `base`.
    pub fn evaluate(&self, marker: &Marker, base: &Path) -> bool {
        match marker {
            Marker::FileExists(path) => base.join(path).is_file(),
            Marker::DirExists(path) => base.join(path).is_dir(),
            Marker::FileContains { path, pattern } => self.file_contains(base, path, pattern),
            Marker::GlobMatchesAny(glob) => self.walk_matching(base, glob, |_| true),
            Marker::GlobContains { glob, pattern } => {
                self.walk_matching(base, glob, |path| self.text_matches(path, pattern))
            }
        }
    }

    fn file_contains(&self, base: &Path, path: &Path, pattern: &Regex) -> bool {
        let full = base.join(path);
        full.is_file() && self.text_matches(&full, pattern)
    }

    fn text_matches(&self, path: &Path, pattern: &Regex) -> bool {
        match read_to_string_with_limit(path, self.limits.max_file_size) {
            Ok(content) => pattern.is_match(&content),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "content marker unreadable");
                false
            }
        }
    }

    /// Walk `base` within the probe budget until a file matching `glob` is
    /// accepted.
    fn walk_matching(
        &self,
        base: &Path,
        glob: &GlobMatcher,
        mut accept: impl FnMut(&Path) -> bool,
    ) -> bool {
        let pattern = glob.glob().glob();
        let walker = WalkDir::new(base)
            .follow_links(false)
            .max_depth(self.limits.max_depth)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                let name = e.file_name().to_string_lossy();
                if !name.starts_with('.') && !SKIP_DIRS.contains(&&*name) {
                    return true;
                }
                e.path()
                    .strip_prefix(base)
                    .map(|rel| glob_names_dir(pattern, rel))
                    .unwrap_or(false)
            });

        for (visited, entry) in walker.enumerate() {
            if visited >= self.limits.max_entries {
                tracing::debug!(
                    glob = pattern,
                    max_entries = self.limits.max_entries,
                    "glob probe budget exhausted"
                );
                return false;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel_path = entry.path().strip_prefix(base).unwrap_or(entry.path());
            if (glob.is_match(rel_path) || glob.is_match(entry.file_name()))
                && accept(entry.path())
            {
                return true;
            }
        }

        false
    }
}

/// Whether `pattern` spells out `dir` (relative to the base) as its leading
/// components, e.g. `.github/workflows/*.yml` names `.github`.
fn glob_names_dir(pattern: &str, dir: &Path) -> bool {
    let mut prefix = dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    prefix.push('/');
    pattern.starts_with(&prefix)
}
