//! Project override file.
//!
//! `.primer/overrides.toml` reshapes the composed module list:
//!
//! ```toml
//! skip = ["docker"]
//! additional = ["security", "commits"]
//! ```
//!
//! A missing file means no overrides. A broken file is reported and treated
//! as no overrides; it never stops composition.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::project_overrides_path;
use crate::discovery::ModuleList;
use crate::error::{FailOpen, PrimerError, Result};
use crate::util::read_to_string_limited;

/// Commented template written by `primer init`.
pub const OVERRIDE_TEMPLATE: &str = r#"# Primer project overrides.
#
# Modules listed in `skip` are removed from the composed document even when
# detection activates them. Modules listed in `additional` are appended after
# the detected ones. A module in both lists is skipped.

skip = []

additional = []
"#;

/// Project-specific skip and additional module lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverrideSpec {
    /// Modules removed from the final list.
    pub skip: Vec<String>,
    /// Modules appended to the final list.
    pub additional: Vec<String>,
}

impl OverrideSpec {
    /// Create a spec. Identifiers are trimmed, blanks dropped, duplicates
    /// collapsed to their first occurrence.
    pub fn new<S: AsRef<str>>(skip: &[S], additional: &[S]) -> Self {
        Self {
            skip: normalize(skip),
            additional: normalize(additional),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skip.is_empty() && self.additional.is_empty()
    }

    /// Check if an identifier is skipped.
    pub fn skips(&self, id: &str) -> bool {
        self.skip.iter().any(|s| s == id)
    }

    /// Parse an override document.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let raw: OverrideSpec = toml::from_str(content)?;
        Ok(Self::new(&raw.skip, &raw.additional))
    }
}

/// Write [`OVERRIDE_TEMPLATE`] to `.primer/overrides.toml` under `target`.
///
/// An existing file is left alone unless `force` is set. Returns `true` when
/// the file was written.
pub fn write_override_template(target: &Path, force: bool) -> Result<bool> {
    let path = project_overrides_path(target);
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PrimerError::storage(parent, e))?;
    }
    fs::write(&path, OVERRIDE_TEMPLATE).map_err(|e| PrimerError::storage(&path, e))?;
    Ok(true)
}

fn normalize<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    ids.iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .collect::<ModuleList>()
        .into_vec()
}

/// Reads the project override file.
#[derive(Debug, Clone, Default)]
pub struct OverrideLoader {
    path: Option<PathBuf>,
}

impl OverrideLoader {
    /// Loader reading `.primer/overrides.toml` under the target directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader reading a fixed file regardless of target directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The override file consulted for `base`.
    pub fn path_for(&self, base: &Path) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| project_overrides_path(base))
    }

    /// Load overrides, reporting read and parse failures.
    ///
    /// A missing file is not an error; any other failure to stat it is.
    pub fn try_load(&self, base: &Path) -> Result<OverrideSpec> {
        let path = self.path_for(base);
        match fs::metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(OverrideSpec::default());
            }
            Err(e) => return Err(PrimerError::overrides(&path, e.to_string())),
        }

        let content = read_to_string_limited(&path)
            .map_err(|e| PrimerError::overrides(&path, e.to_string()))?;
        let spec = OverrideSpec::from_toml(&content)
            .map_err(|e| PrimerError::overrides(&path, e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            skip = spec.skip.len(),
            additional = spec.additional.len(),
            "loaded overrides"
        );
        Ok(spec)
    }

    /// Load overrides, falling back to an empty spec on failure.
    pub fn load(&self, base: &Path) -> OverrideSpec {
        self.try_load(base).fail_open_default("loading overrides")
    }

    /// Load overrides, returning the failure message alongside the empty
    /// fallback so callers can surface it.
    pub fn load_with_warning(&self, base: &Path) -> (OverrideSpec, Option<String>) {
        match self.try_load(base) {
            Ok(spec) => (spec, None),
            Err(e) => {
                tracing::warn!("{} (ignoring overrides)", e);
                (OverrideSpec::default(), Some(e.to_string()))
            }
        }
    }
}
