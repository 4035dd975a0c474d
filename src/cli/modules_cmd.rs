//! Modules command for Primer.
//!
//! Lists every module the store can resolve and which layer supplies it.

use serde::{Deserialize, Serialize};

use crate::modules::{LayeredModuleStore, ModuleStore};

/// Options for the modules command.
#[derive(Debug, Clone, Default)]
pub struct ModulesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the modules command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Store layers, highest priority first.
    pub layers: Vec<String>,
    /// Available modules, sorted by identifier.
    pub modules: Vec<ModuleDetail>,
}

/// One available module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDetail {
    /// Module identifier.
    pub id: String,
    /// Layer that supplies the module.
    pub origin: String,
    /// Lower-priority layers that also define it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shadowed: Vec<String>,
}

/// The modules command implementation.
pub struct ModulesCommand<'a> {
    store: &'a LayeredModuleStore,
}

impl<'a> ModulesCommand<'a> {
    /// Create a new modules command.
    pub fn new(store: &'a LayeredModuleStore) -> Self {
        Self { store }
    }

    /// Run the modules command.
    pub fn run(&self, _options: &ModulesOptions) -> ModulesOutput {
        let modules = self
            .store
            .ids()
            .into_iter()
            .filter_map(|id| {
                let mut providers = self.store.providers(&id).into_iter().map(str::to_string);
                let origin = providers.next()?;
                Some(ModuleDetail {
                    id,
                    origin,
                    shadowed: providers.collect(),
                })
            })
            .collect();

        ModulesOutput {
            success: true,
            layers: self
                .store
                .layer_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            modules,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ModulesOutput, options: &ModulesOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ModulesOutput) -> String {
        if output.modules.is_empty() {
            return "No modules available.\n".to_string();
        }

        let mut lines = vec![format!(
            "Available modules (layers: {}):\n",
            output.layers.join(" > ")
        )];
        for module in &output.modules {
            let shadow = if module.shadowed.is_empty() {
                String::new()
            } else {
                format!(" (shadows {})", module.shadowed.join(", "))
            };
            lines.push(format!("  {} [{}]{}", module.id, module.origin, shadow));
        }

        lines.join("\n") + "\n"
    }
}
