//! Rule evaluation.
//!
//! The detector folds a [`RuleSet`] over one directory: each matching rule
//! appends its modules to a [`ModuleList`], in rule order, first occurrence
//! wins. Nothing is cached between runs.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discovery::marker::MarkerProbe;
use crate::discovery::rules::RuleSet;

/// An insertion-ordered set of module identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleList {
    order: Vec<String>,
    index: HashSet<String>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier. Returns `false` if it was already present.
    pub fn push(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Remove an identifier. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.order.retain(|existing| existing != id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl<S: Into<String>> FromIterator<S> for ModuleList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for id in iter {
            list.push(id);
        }
        list
    }
}

impl<S: Into<String>> Extend<S> for ModuleList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for id in iter {
            self.push(id);
        }
    }
}

/// A rule that matched during detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Rule name.
    pub rule: String,
    /// Modules the rule lists, including ones an earlier rule already added.
    pub modules: Vec<String>,
}

/// Evaluates a rule set against project directories.
#[derive(Debug, Clone)]
pub struct Detector {
    rules: RuleSet,
    probe: MarkerProbe,
}

impl Detector {
    pub fn new(rules: RuleSet, probe: MarkerProbe) -> Self {
        Self { rules, probe }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Return the activated modules for `base`, in rule order, deduplicated.
    pub fn detect(&self, base: &Path) -> ModuleList {
        let mut modules = ModuleList::new();
        for matched in self.explain(base) {
            modules.extend(matched.modules);
        }
        tracing::debug!(
            base = %base.display(),
            activated = modules.len(),
            "detection complete"
        );
        modules
    }

    /// Return the rules that match `base`, in rule order.
    pub fn explain(&self, base: &Path) -> Vec<RuleMatch> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(&self.probe, base))
            .map(|rule| {
                tracing::debug!(rule = rule.name(), modules = ?rule.modules(), "rule matched");
                RuleMatch {
                    rule: rule.name().to_string(),
                    modules: rule.modules().to_vec(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::rules::{Predicate, RuleDef};
    use std::fs;
    use tempfile::TempDir;

    fn rule(name: &str, file: &str, modules: &[&str]) -> RuleDef {
        RuleDef {
            name: name.to_string(),
            when: Predicate::File(file.to_string()),
            modules: modules.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn detector(defs: &[RuleDef]) -> Detector {
        Detector::new(RuleSet::from_defs(defs).unwrap(), MarkerProbe::default())
    }

    #[test]
    fn test_module_list_dedup_keeps_first() {
        let mut list = ModuleList::new();
        assert!(list.push("a"));
        assert!(list.push("b"));
        assert!(!list.push("a"));
        assert_eq!(list.as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_module_list_remove() {
        let mut list: ModuleList = ["a", "b", "c"].into_iter().collect();
        assert!(list.remove("b"));
        assert!(!list.remove("b"));
        assert!(!list.contains("b"));
        assert_eq!(list.into_vec(), vec!["a", "c"]);
    }

    #[test]
    fn test_single_rule_scenario() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A"), "").unwrap();

        let modules = detector(&[rule("a", "A", &["mod1"])]).detect(dir.path());
        assert_eq!(modules.as_slice(), ["mod1"]);
    }

    #[test]
    fn test_no_markers_match() {
        let dir = TempDir::new().unwrap();
        let modules = detector(&[rule("a", "A", &["mod1"])]).detect(dir.path());
        assert!(modules.is_empty());
    }

    #[test]
    fn test_shared_module_appears_once_at_first_position() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A"), "").unwrap();
        fs::write(dir.path().join("B"), "").unwrap();

        let det = detector(&[
            rule("first", "A", &["mod1", "mod2"]),
            rule("second", "B", &["mod3", "mod1"]),
        ]);
        assert_eq!(det.detect(dir.path()).as_slice(), ["mod1", "mod2", "mod3"]);
    }

    #[test]
    fn test_order_follows_rules_not_alphabet() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A"), "").unwrap();
        fs::write(dir.path().join("B"), "").unwrap();

        let det = detector(&[rule("z", "B", &["zeta"]), rule("a", "A", &["alpha"])]);
        assert_eq!(det.detect(dir.path()).as_slice(), ["zeta", "alpha"]);
    }

    #[test]
    fn test_detect_is_deterministic() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::write(dir.path().join("Dockerfile"), "").unwrap();
        fs::create_dir(dir.path().join("tests")).unwrap();

        let det = Detector::new(RuleSet::builtin().unwrap(), MarkerProbe::default());
        let first = det.detect(dir.path());
        let second = det.detect(dir.path());
        assert_eq!(first, second);
        assert_eq!(first.as_slice(), ["rust", "docker", "testing"]);
    }

    #[test]
    fn test_builtin_react_project() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "18"}, "devDependencies": {"typescript": "5"}}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();

        let det = Detector::new(RuleSet::builtin().unwrap(), MarkerProbe::default());
        assert_eq!(
            det.detect(dir.path()).as_slice(),
            ["node", "typescript", "react", "ci"]
        );
    }

    #[test]
    fn test_builtin_kubernetes_manifests() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("deploy")).unwrap();
        fs::write(
            dir.path().join("deploy/app.yaml"),
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: app\n",
        )
        .unwrap();

        let det = Detector::new(RuleSet::builtin().unwrap(), MarkerProbe::default());
        assert_eq!(det.detect(dir.path()).as_slice(), ["kubernetes"]);
    }

    #[test]
    fn test_builtin_plain_yaml_is_not_kubernetes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("docker-compose.yml"),
            "services:\n  web:\n    image: nginx\n",
        )
        .unwrap();

        let det = Detector::new(RuleSet::builtin().unwrap(), MarkerProbe::default());
        assert_eq!(det.detect(dir.path()).as_slice(), ["docker"]);
    }

    #[test]
    fn test_explain_lists_matched_rules() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("B"), "").unwrap();

        let det = detector(&[rule("a", "A", &["mod1"]), rule("b", "B", &["mod2"])]);
        let matches = det.explain(dir.path());
        assert_eq!(
            matches,
            vec![RuleMatch {
                rule: "b".to_string(),
                modules: vec!["mod2".to_string()],
            }]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: every pushed id appears exactly once, at its first position
            #[test]
            fn prop_module_list_first_occurrence(ids in prop::collection::vec("[a-e]", 0..30)) {
                let list: ModuleList = ids.iter().cloned().collect();

                let mut expected: Vec<String> = Vec::new();
                for id in &ids {
                    if !expected.contains(id) {
                        expected.push(id.clone());
                    }
                }
                prop_assert_eq!(list.as_slice(), expected.as_slice());
            }

            // Property: removal keeps the relative order of the rest
            #[test]
            fn prop_module_list_remove_preserves_order(
                ids in prop::collection::vec("[a-e]", 0..30),
                victim in "[a-e]",
            ) {
                let mut list: ModuleList = ids.iter().cloned().collect();
                let before: Vec<String> = list.as_slice().to_vec();
                list.remove(&victim);

                let expected: Vec<String> = before.into_iter().filter(|id| *id != victim).collect();
                prop_assert_eq!(list.as_slice(), expected.as_slice());
                prop_assert!(!list.contains(&victim));
            }
        }
    }
}
