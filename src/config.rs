//! Configuration loading for Primer.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.primer/config.toml` in the target directory)
//! 3. User config (`~/.primer/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{PrimerError, Result};
use crate::util::{read_to_string_limited, DEFAULT_MAX_FILE_SIZE};

/// Name of the project-local Primer directory.
pub const PRIMER_DIR: &str = ".primer";

/// Main configuration struct for Primer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Rule table sources.
    pub rules: RulesConfig,
    /// Module store sources.
    pub modules: ModulesConfig,
    /// Filesystem probe limits.
    pub probe: ProbeConfig,
    /// Document rendering.
    pub render: RenderConfig,
}

/// Rule table configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Extra rules file. Falls back to `.primer/rules.toml` when unset.
    pub path: Option<PathBuf>,
    /// Whether the built-in rules run before the extra rules.
    pub include_builtin: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: None,
            include_builtin: true,
        }
    }
}

/// Module store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModulesConfig {
    /// Directory of `<id>.md` module files. Falls back to `~/.primer/modules`.
    pub dir: Option<PathBuf>,
}

/// Limits applied to filesystem probes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Maximum directory depth walked by glob markers.
    pub max_depth: usize,
    /// Maximum number of entries visited by a single glob marker.
    pub max_entries: usize,
    /// Files larger than this never match a content marker.
    pub max_file_size: u64,
}

/// Smallest accepted walk depth.
pub const MIN_MAX_DEPTH: usize = 1;

/// Smallest accepted entry budget.
pub const MIN_MAX_ENTRIES: usize = 1;

impl ProbeConfig {
    /// Check if a walk depth is valid.
    pub fn is_valid_max_depth(value: usize) -> bool {
        value >= MIN_MAX_DEPTH
    }

    /// Check if an entry budget is valid.
    pub fn is_valid_max_entries(value: usize) -> bool {
        value >= MIN_MAX_ENTRIES
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_entries: 10_000,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Text placed between consecutive modules.
    pub delimiter: String,
    /// Text rendered for an unresolved module. `{id}` is replaced with the
    /// module identifier.
    pub placeholder: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            delimiter: "\n\n---\n\n".to_string(),
            placeholder: "<!-- module '{id}' not found -->".to_string(),
        }
    }
}

impl RenderConfig {
    /// Render the placeholder for an identifier.
    pub fn placeholder_for(&self, id: &str) -> String {
        self.placeholder.replace("{id}", id)
    }
}

impl Config {
    /// Load configuration for the given target directory.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Project config (`.primer/config.toml` in `target`)
    /// 3. User config (`~/.primer/config.toml`)
    /// 4. Defaults
    pub fn load_from_dir(target: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(target) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.primer/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = primer_home()?.join("config.toml");
        Self::load_optional(&path)
    }

    /// Load project config from `.primer/config.toml` in the given directory.
    fn load_project_config(target: &Path) -> Option<Config> {
        Self::load_optional(&project_primer_dir(target).join("config.toml"))
    }

    /// Load a config file that may not exist.
    ///
    /// A missing file is silent; a broken one is logged and skipped.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.is_file() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = read_to_string_limited(path)?;
        toml::from_str(&content).map_err(|e| PrimerError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PRIMER_MODULES_DIR") {
            if !val.is_empty() {
                self.modules.dir = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("PRIMER_RULES") {
            if !val.is_empty() {
                self.rules.path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("PRIMER_MAX_DEPTH") {
            match val.parse::<usize>() {
                Ok(n) if ProbeConfig::is_valid_max_depth(n) => self.probe.max_depth = n,
                _ => tracing::warn!(
                    "PRIMER_MAX_DEPTH={} is invalid (must be >= {}), ignoring",
                    val,
                    MIN_MAX_DEPTH
                ),
            }
        }

        if let Ok(val) = env::var("PRIMER_MAX_ENTRIES") {
            match val.parse::<usize>() {
                Ok(n) if ProbeConfig::is_valid_max_entries(n) => self.probe.max_entries = n,
                _ => tracing::warn!(
                    "PRIMER_MAX_ENTRIES={} is invalid (must be >= {}), ignoring",
                    val,
                    MIN_MAX_ENTRIES
                ),
            }
        }

        if let Ok(val) = env::var("PRIMER_DELIMITER") {
            self.render.delimiter = val.replace("\\n", "\n");
        }
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` that differ from the defaults win. A higher layer
    /// that explicitly sets a default value cannot reset a lower layer's
    /// customization.
    fn merge(mut self, other: Config) -> Self {
        if other.rules.path.is_some() {
            self.rules.path = other.rules.path;
        }
        if other.rules.include_builtin != RulesConfig::default().include_builtin {
            self.rules.include_builtin = other.rules.include_builtin;
        }

        if other.modules.dir.is_some() {
            self.modules.dir = other.modules.dir;
        }

        let default_probe = ProbeConfig::default();
        if other.probe.max_depth != default_probe.max_depth
            && ProbeConfig::is_valid_max_depth(other.probe.max_depth)
        {
            self.probe.max_depth = other.probe.max_depth;
        }
        if other.probe.max_entries != default_probe.max_entries
            && ProbeConfig::is_valid_max_entries(other.probe.max_entries)
        {
            self.probe.max_entries = other.probe.max_entries;
        }
        if other.probe.max_file_size != default_probe.max_file_size {
            self.probe.max_file_size = other.probe.max_file_size;
        }

        let default_render = RenderConfig::default();
        if other.render.delimiter != default_render.delimiter {
            self.render.delimiter = other.render.delimiter;
        }
        if other.render.placeholder != default_render.placeholder {
            self.render.placeholder = other.render.placeholder;
        }

        self
    }
}

/// Get the Primer home directory.
///
/// `PRIMER_HOME` wins when set to a non-empty value; otherwise `~/.primer`.
pub fn primer_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("PRIMER_HOME") {
        if home.is_empty() {
            tracing::warn!("PRIMER_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|h| h.join(PRIMER_DIR))
}

/// Get the user module directory (`<primer_home>/modules`).
pub fn user_modules_dir() -> Option<PathBuf> {
    primer_home().map(|h| h.join("modules"))
}

/// Get the project `.primer/` directory for a target directory.
pub fn project_primer_dir(target: &Path) -> PathBuf {
    target.join(PRIMER_DIR)
}

/// Get the project override file path.
pub fn project_overrides_path(target: &Path) -> PathBuf {
    project_primer_dir(target).join("overrides.toml")
}

/// Get the project rules file path.
pub fn project_rules_path(target: &Path) -> PathBuf {
    project_primer_dir(target).join("rules.toml")
}

/// Get the project module directory.
pub fn project_modules_dir(target: &Path) -> PathBuf {
    project_primer_dir(target).join("modules")
}
