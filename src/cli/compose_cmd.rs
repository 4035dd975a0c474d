//! Compose command for Primer.
//!
//! Runs the full pipeline and prints the rendered document.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::compose::{CompositionMetadata, CompositionResult};
use crate::engine::Primer;

/// Options for the compose command.
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// Output the full result as JSON.
    pub json: bool,
    /// Suppress the stderr summary. The document is always printed.
    pub quiet: bool,
}

/// Output format for the compose command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Final module identifiers, in render order.
    pub modules: Vec<String>,
    /// Rendered document.
    pub document: String,
    /// Counts and diagnostics.
    pub metadata: CompositionMetadata,
}

impl From<CompositionResult> for ComposeOutput {
    fn from(result: CompositionResult) -> Self {
        Self {
            success: true,
            modules: result.entries.into_iter().map(|e| e.id).collect(),
            document: result.document,
            metadata: result.metadata,
        }
    }
}

/// The compose command implementation.
pub struct ComposeCommand<'a> {
    primer: &'a Primer,
    target: PathBuf,
}

impl<'a> ComposeCommand<'a> {
    /// Create a new compose command.
    pub fn new(primer: &'a Primer, target: impl Into<PathBuf>) -> Self {
        Self {
            primer,
            target: target.into(),
        }
    }

    /// Run the compose command.
    pub fn run(&self, _options: &ComposeOptions) -> ComposeOutput {
        self.primer.run(&self.target).into()
    }

    /// Format output based on options.
    ///
    /// The human form is the document exactly as rendered.
    pub fn format_output(&self, output: &ComposeOutput, options: &ComposeOptions) -> String {
        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            output.document.clone()
        }
    }

    /// Write the formatted output to `out` without altering the document.
    pub fn write_output<W: Write>(
        &self,
        output: &ComposeOutput,
        options: &ComposeOptions,
        out: &mut W,
    ) -> io::Result<()> {
        let formatted = self.format_output(output, options);
        out.write_all(formatted.as_bytes())?;
        if options.json {
            out.write_all(b"\n")?;
        }
        out.flush()
    }

    /// One-line status for stderr.
    pub fn format_summary(&self, output: &ComposeOutput) -> String {
        let mut lines = vec![format!("primer: {}", output.metadata.summary())];
        lines.extend(
            output
                .metadata
                .warnings
                .iter()
                .map(|w| format!("primer: warning: {}", w)),
        );
        lines.join("\n")
    }
}
