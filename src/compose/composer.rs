//! Composition of the final document.
//!
//! Steps, in order:
//! 1. start from the detected list (rule order, already deduplicated)
//! 2. append `additional` entries not already present
//! 3. drop every `skip` entry
//! 4. resolve each survivor through the module store
//! 5. join bodies (or placeholders) with the configured delimiter
//!
//! Composition cannot fail. Unresolved modules become placeholders and are
//! listed in the metadata.

use serde::{Deserialize, Serialize};

use crate::compose::overrides::OverrideSpec;
use crate::config::RenderConfig;
use crate::discovery::ModuleList;
use crate::modules::{Module, ModuleStore};

/// One entry of the final module list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedModule {
    /// Module identifier.
    pub id: String,
    /// Resolved module, or `None` when no store has it.
    pub module: Option<Module>,
}

impl ComposedModule {
    pub fn is_resolved(&self) -> bool {
        self.module.is_some()
    }
}

/// Counts and diagnostics for one composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionMetadata {
    /// Modules activated by detection.
    pub activated: usize,
    /// Modules removed by the skip list.
    pub skipped: usize,
    /// Modules appended by the additional list.
    pub additional: usize,
    /// Modules in the final list that no store could resolve.
    pub unresolved: Vec<String>,
    /// Recovered problems, e.g. an unreadable override file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CompositionMetadata {
    /// One-line summary for logs and stderr.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "activated {}, skipped {}, additional {}, unresolved {}",
            self.activated,
            self.skipped,
            self.additional,
            self.unresolved.len()
        );
        if !self.unresolved.is_empty() {
            line.push_str(&format!(" ({})", self.unresolved.join(", ")));
        }
        if !self.warnings.is_empty() {
            line.push_str(&format!(", {} warning(s)", self.warnings.len()));
        }
        line
    }
}

/// Output of a composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionResult {
    /// Final modules, in render order.
    pub entries: Vec<ComposedModule>,
    /// Rendered document.
    pub document: String,
    /// Counts and diagnostics.
    pub metadata: CompositionMetadata,
}

impl CompositionResult {
    /// Final identifiers, in render order.
    pub fn module_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }
}

/// Builds the final document from detected modules and overrides.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    render: RenderConfig,
}

impl Composer {
    pub fn new(render: RenderConfig) -> Self {
        Self { render }
    }

    /// Compose the final document.
    pub fn compose<S>(
        &self,
        detected: &ModuleList,
        overrides: &OverrideSpec,
        store: &S,
    ) -> CompositionResult
    where
        S: ModuleStore + ?Sized,
    {
        let mut metadata = CompositionMetadata {
            activated: detected.len(),
            ..Default::default()
        };

        let mut modules = detected.clone();
        for id in &overrides.additional {
            if modules.push(id.as_str()) {
                metadata.additional += 1;
            }
        }
        for id in &overrides.skip {
            if modules.remove(id) {
                metadata.skipped += 1;
            }
        }

        let entries: Vec<ComposedModule> = modules
            .iter()
            .map(|id| {
                let module = store.resolve(id);
                if module.is_none() {
                    tracing::warn!(module = id, "module not found");
                    metadata.unresolved.push(id.to_string());
                }
                ComposedModule {
                    id: id.to_string(),
                    module,
                }
            })
            .collect();

        let document = self.render(&entries);
        tracing::debug!("{}", metadata.summary());

        CompositionResult {
            entries,
            document,
            metadata,
        }
    }

    /// Join module bodies, or placeholders for unresolved entries.
    pub fn render(&self, entries: &[ComposedModule]) -> String {
        entries
            .iter()
            .map(|entry| match &entry.module {
                Some(module) => module.body.clone(),
                None => self.render.placeholder_for(&entry.id),
            })
            .collect::<Vec<_>>()
            .join(&self.render.delimiter)
    }
}
