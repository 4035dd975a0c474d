//! Detection rules.
//!
//! A rule pairs a predicate over filesystem markers with the module
//! identifiers it activates. Rules are authored as TOML:
//!
//! ```toml
//! [[rule]]
//! name = "react"
//! when = { contains = { path = "package.json", text = "\"react\"" } }
//! modules = ["node", "react"]
//! ```
//!
//! The authored [`Predicate`] is compiled into a [`Condition`] when the
//! [`RuleSet`] is built. Anything wrong with the table (an empty module
//! list, a duplicate name, a bad regex or glob) is reported then, before
//! any project is inspected.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::discovery::marker::{Marker, MarkerProbe};
use crate::error::{PrimerError, Result};
use crate::util::read_to_string_limited;

const BUILTIN_RULES: &str = include_str!("builtin_rules.toml");

/// Authored form of a rule condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// A regular file exists.
    File(String),
    /// A directory exists.
    Dir(String),
    /// A file contains a literal substring.
    Contains { path: String, text: String },
    /// A file matches a regular expression.
    Matches { path: String, regex: String },
    /// Some file in the tree matches a glob.
    Glob(String),
    /// Some file in the tree matching a glob matches a regular expression.
    GlobContains { glob: String, regex: String },
    /// Every child predicate holds.
    All(Vec<Predicate>),
    /// At least one child predicate holds.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Compile into a [`Condition`], validating paths, patterns, and globs.
    pub fn compile(&self, rule: &str) -> Result<Condition> {
        let condition = match self {
            Self::File(path) => Condition::Marker(Marker::FileExists(relative_path(rule, path)?)),
            Self::Dir(path) => Condition::Marker(Marker::DirExists(relative_path(rule, path)?)),
            Self::Contains { path, text } => {
                if text.is_empty() {
                    return Err(PrimerError::rules(rule, "contains: empty text"));
                }
                Condition::Marker(Marker::FileContains {
                    path: relative_path(rule, path)?,
                    pattern: compile_regex(rule, &regex::escape(text))?,
                })
            }
            Self::Matches { path, regex } => Condition::Marker(Marker::FileContains {
                path: relative_path(rule, path)?,
                pattern: compile_regex(rule, regex)?,
            }),
            Self::Glob(pattern) => {
                Condition::Marker(Marker::GlobMatchesAny(compile_glob(rule, pattern)?))
            }
            Self::GlobContains { glob, regex } => Condition::Marker(Marker::GlobContains {
                glob: compile_glob(rule, glob)?,
                pattern: compile_regex(rule, regex)?,
            }),
            Self::All(children) => Condition::All(compile_children(rule, "all", children)?),
            Self::Any(children) => Condition::Any(compile_children(rule, "any", children)?),
        };
        Ok(condition)
    }
}

fn compile_children(rule: &str, op: &str, children: &[Predicate]) -> Result<Vec<Condition>> {
    if children.is_empty() {
        return Err(PrimerError::rules(rule, format!("{op}: no predicates")));
    }
    children.iter().map(|c| c.compile(rule)).collect()
}

fn compile_glob(rule: &str, pattern: &str) -> Result<GlobMatcher> {
    Ok(GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map_err(|e| PrimerError::rules(rule, format!("invalid glob: {e}")))?
        .compile_matcher())
}

fn compile_regex(rule: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| PrimerError::rules(rule, format!("invalid pattern: {e}")))
}

/// Markers may only look inside the probed directory.
fn relative_path(rule: &str, path: &str) -> Result<PathBuf> {
    if path.trim().is_empty() {
        return Err(PrimerError::rules(rule, "empty marker path"));
    }
    let parsed = Path::new(path);
    let escapes = parsed
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(PrimerError::rules(
            rule,
            format!("marker path must be relative to the project: {path}"),
        ));
    }
    Ok(parsed.to_path_buf())
}

/// Compiled rule condition.
#[derive(Debug, Clone)]
pub enum Condition {
    Marker(Marker),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluate against `base`. `All` and `Any` short-circuit left to right.
    pub fn evaluate(&self, probe: &MarkerProbe, base: &Path) -> bool {
        match self {
            Self::Marker(marker) => probe.evaluate(marker, base),
            Self::All(children) => children.iter().all(|c| c.evaluate(probe, base)),
            Self::Any(children) => children.iter().any(|c| c.evaluate(probe, base)),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (op, children) = match self {
            Self::Marker(marker) => return write!(f, "{marker}"),
            Self::All(children) => ("all", children),
            Self::Any(children) => ("any", children),
        };
        write!(f, "{op}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}

/// A rule as written in a rules file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub name: String,
    pub when: Predicate,
    pub modules: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleDef>,
}

/// A validated, compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    condition: Condition,
    modules: Vec<String>,
}

impl Rule {
    /// Compile a rule definition.
    pub fn compile(def: &RuleDef) -> Result<Self> {
        let name = def.name.trim();
        if name.is_empty() {
            return Err(PrimerError::rules("<unnamed>", "rule name is empty"));
        }
        if def.modules.is_empty() {
            return Err(PrimerError::rules(name, "rule activates no modules"));
        }
        if def.modules.iter().any(|m| m.trim().is_empty()) {
            return Err(PrimerError::rules(name, "empty module identifier"));
        }

        Ok(Self {
            name: name.to_string(),
            condition: def.when.compile(name)?,
            modules: def.modules.iter().map(|m| m.trim().to_string()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Module identifiers activated when the rule matches, in authored order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Check whether the rule matches `base`.
    pub fn matches(&self, probe: &MarkerProbe, base: &Path) -> bool {
        self.condition.evaluate(probe, base)
    }
}

/// An ordered, immutable collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, rejecting invalid rules and duplicate names.
    pub fn from_defs(defs: &[RuleDef]) -> Result<Self> {
        let rules = defs.iter().map(Rule::compile).collect::<Result<Vec<_>>>()?;
        Self::from_rules(rules)
    }

    fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(PrimerError::rules(&rule.name, "duplicate rule name"));
            }
        }
        Ok(Self { rules })
    }

    /// Parse a rules document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(content)
            .map_err(|e| PrimerError::rules("<rules file>", e.to_string()))?;
        Self::from_defs(&file.rules)
    }

    /// Load a rules file from disk.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = read_to_string_limited(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            PrimerError::Rules { rule, message } => {
                PrimerError::rules(rule, format!("{message} ({})", path.display()))
            }
            other => other,
        })
    }

    /// The built-in rule table.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN_RULES)
    }

    /// Append another rule set after this one.
    pub fn extend(self, other: RuleSet) -> Result<Self> {
        let mut rules = self.rules;
        rules.extend(other.rules);
        Self::from_rules(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Every identifier any rule can activate, first-seen order.
    pub fn module_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rules
            .iter()
            .flat_map(|r| r.modules.iter())
            .filter(|m| seen.insert(m.as_str()))
            .cloned()
            .collect()
    }
}
