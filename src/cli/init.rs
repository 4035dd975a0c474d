//! Init command for Primer.
//!
//! Scaffolds the project `.primer/` directory with an override template and
//! an empty module directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compose::write_override_template;
use crate::config::{project_modules_dir, project_overrides_path, project_primer_dir};

/// Options for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Overwrite an existing override file.
    pub force: bool,
}

/// Output format for the init command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitOutput {
    /// Whether initialization was successful.
    pub success: bool,
    /// Files and directories created.
    pub created: Vec<String>,
    /// Files and directories that already existed.
    pub skipped: Vec<String>,
    /// Error message if initialization failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InitOutput {
    /// Create a successful output.
    pub fn success(created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: true,
            created,
            skipped,
            error: None,
        }
    }

    /// Create a failed output, keeping what was created before the failure.
    pub fn failure(error: impl Into<String>, created: Vec<String>, skipped: Vec<String>) -> Self {
        Self {
            success: false,
            created,
            skipped,
            error: Some(error.into()),
        }
    }
}

/// The init command implementation.
pub struct InitCommand {
    target: PathBuf,
}

impl InitCommand {
    /// Create a new init command for a project directory.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Run the init command.
    pub fn run(&self, options: &InitOptions) -> InitOutput {
        let mut created = Vec::new();
        let mut skipped = Vec::new();

        for dir in [
            project_primer_dir(&self.target),
            project_modules_dir(&self.target),
        ] {
            match ensure_dir(&dir) {
                Ok(true) => created.push(dir.display().to_string()),
                Ok(false) => skipped.push(dir.display().to_string()),
                Err(e) => return InitOutput::failure(e, created, skipped),
            }
        }

        let overrides = project_overrides_path(&self.target);
        match write_override_template(&self.target, options.force) {
            Ok(true) => created.push(overrides.display().to_string()),
            Ok(false) => skipped.push(overrides.display().to_string()),
            Err(e) => return InitOutput::failure(e.to_string(), created, skipped),
        }

        InitOutput::success(created, skipped)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &InitOutput, options: &InitOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &InitOutput) -> String {
        let mut lines = Vec::new();

        if !output.success {
            lines.push(format!(
                "Init failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ));
            if !output.created.is_empty() {
                lines.push(String::new());
                lines.push("Partially created before failure:".to_string());
                lines.extend(output.created.iter().map(|p| format!("  {}", p)));
            }
            return lines.join("\n") + "\n";
        }

        if !output.created.is_empty() {
            lines.push("Created:".to_string());
            lines.extend(output.created.iter().map(|p| format!("  + {}", p)));
        }
        if !output.skipped.is_empty() {
            lines.push("Already present:".to_string());
            lines.extend(output.skipped.iter().map(|p| format!("  = {}", p)));
        }

        lines.join("\n") + "\n"
    }
}

/// Ensure a directory exists. Returns `Ok(true)` if it was created.
fn ensure_dir(path: &Path) -> Result<bool, String> {
    if path.exists() {
        if path.is_dir() {
            return Ok(false);
        }
        return Err(format!("{} exists but is not a directory", path.display()));
    }

    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))?;
    Ok(true)
}
