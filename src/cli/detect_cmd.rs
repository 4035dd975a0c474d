//! Detect command for Primer.
//!
//! Shows which rules match the target directory and the modules they
//! activate, without applying overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::discovery::{Detector, ModuleList, RuleMatch};

/// Options for the detect command.
#[derive(Debug, Clone, Default)]
pub struct DetectOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the detect command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Directory that was inspected.
    pub target: String,
    /// Matched rules, in rule order.
    pub matches: Vec<RuleMatch>,
    /// Activated modules, deduplicated, in activation order.
    pub modules: Vec<String>,
}

/// The detect command implementation.
pub struct DetectCommand<'a> {
    detector: &'a Detector,
    target: PathBuf,
}

impl<'a> DetectCommand<'a> {
    /// Create a new detect command.
    pub fn new(detector: &'a Detector, target: impl Into<PathBuf>) -> Self {
        Self {
            detector,
            target: target.into(),
        }
    }

    /// Run the detect command.
    pub fn run(&self, _options: &DetectOptions) -> DetectOutput {
        let matches = self.detector.explain(&self.target);
        let modules: ModuleList = matches.iter().flat_map(|m| m.modules.iter().cloned()).collect();

        DetectOutput {
            success: true,
            target: self.target.display().to_string(),
            matches,
            modules: modules.into_vec(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &DetectOutput, options: &DetectOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &DetectOutput) -> String {
        if output.matches.is_empty() {
            return format!("No rules matched in {}.\n", output.target);
        }

        let mut lines = vec![format!("Matched rules in {}:\n", output.target)];
        for m in &output.matches {
            lines.push(format!("  [+] {} -> {}", m.rule, m.modules.join(", ")));
        }
        lines.push(String::new());
        lines.push(format!("Activated modules: {}", output.modules.join(", ")));

        lines.join("\n") + "\n"
    }
}
