//! Rules command for Primer.
//!
//! Lists the effective rule table in evaluation order.

use serde::{Deserialize, Serialize};

use crate::discovery::{Rule, RuleSet};

/// Options for the rules command.
#[derive(Debug, Clone, Default)]
pub struct RulesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the rules command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Rules in evaluation order.
    pub rules: Vec<RuleDetail>,
}

/// One rule, flattened for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDetail {
    /// Rule name.
    pub name: String,
    /// Condition, rendered as text.
    pub condition: String,
    /// Modules activated.
    pub modules: Vec<String>,
}

impl From<&Rule> for RuleDetail {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            condition: rule.condition().to_string(),
            modules: rule.modules().to_vec(),
        }
    }
}

/// The rules command implementation.
pub struct RulesCommand<'a> {
    rules: &'a RuleSet,
}

impl<'a> RulesCommand<'a> {
    /// Create a new rules command.
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Run the rules command.
    pub fn run(&self, _options: &RulesOptions) -> RulesOutput {
        RulesOutput {
            success: true,
            rules: self.rules.iter().map(RuleDetail::from).collect(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RulesOutput, options: &RulesOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &RulesOutput) -> String {
        if output.rules.is_empty() {
            return "No rules configured.\n".to_string();
        }

        let width = output.rules.iter().map(|r| r.name.len()).max().unwrap_or(0);
        let mut lines = vec![format!("{} rules, in evaluation order:\n", output.rules.len())];
        for (i, rule) in output.rules.iter().enumerate() {
            lines.push(format!(
                "{:>3}. {:<width$}  [{}]  {}",
                i + 1,
                rule.name,
                rule.modules.join(", "),
                rule.condition,
                width = width
            ));
        }

        lines.join("\n") + "\n"
    }
}
