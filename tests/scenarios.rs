//! End-to-end composition scenarios through the public API.

use std::fs;
use std::path::Path;

use primer::compose::{Composer, OverrideLoader};
use primer::config::{Config, RenderConfig};
use primer::discovery::{Detector, MarkerProbe, RuleSet};
use primer::modules::{LayeredModuleStore, MemoryModuleStore};
use primer::Primer;
use tempfile::TempDir;

const RULES: &str = r#"
[[rule]]
name = "a"
when = { file = "a.manifest" }
modules = ["mod1"]

[[rule]]
name = "b"
when = { dir = "b" }
modules = ["mod3", "mod1"]

[[rule]]
name = "c"
when = { glob = "*.c" }
modules = ["mod1", "mod4"]
"#;

fn primer_with(store: MemoryModuleStore) -> Primer {
    let rules = RuleSet::from_toml(RULES).unwrap();
    Primer::new(
        Detector::new(rules, MarkerProbe::default()),
        LayeredModuleStore::new(vec![Box::new(store)]),
        OverrideLoader::new(),
        Composer::new(RenderConfig::default()),
    )
}

fn write_overrides(base: &Path, content: &str) {
    fs::create_dir_all(base.join(".primer")).unwrap();
    fs::write(base.join(".primer/overrides.toml"), content).unwrap();
}

#[test]
fn manifest_activates_single_module() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.manifest"), "").unwrap();
    let primer = primer_with(MemoryModuleStore::new("memory").with_module("mod1", "X"));

    let result = primer.run(temp.path());

    assert_eq!(result.module_ids(), vec!["mod1"]);
    assert_eq!(result.document, "X");
    assert_eq!(result.metadata.activated, 1);
    assert_eq!(result.metadata.skipped, 0);
    assert_eq!(result.metadata.additional, 0);
    assert!(result.metadata.unresolved.is_empty());
    assert!(result.metadata.warnings.is_empty());
}

#[test]
fn skip_removes_activated_module() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.manifest"), "").unwrap();
    write_overrides(temp.path(), "skip = [\"mod1\"]\n");
    let primer = primer_with(MemoryModuleStore::new("memory").with_module("mod1", "X"));

    let result = primer.run(temp.path());

    assert!(result.module_ids().is_empty());
    assert_eq!(result.document, "");
    assert_eq!(result.metadata.activated, 1);
    assert_eq!(result.metadata.skipped, 1);
}

#[test]
fn additional_missing_module_renders_placeholder() {
    let temp = TempDir::new().unwrap();
    write_overrides(temp.path(), "additional = [\"mod2\"]\n");
    let primer = primer_with(MemoryModuleStore::new("memory"));

    let result = primer.run(temp.path());

    assert_eq!(result.module_ids(), vec!["mod2"]);
    assert_eq!(
        result.document,
        RenderConfig::default().placeholder_for("mod2")
    );
    assert_eq!(result.metadata.activated, 0);
    assert_eq!(result.metadata.additional, 1);
    assert_eq!(result.metadata.unresolved, vec!["mod2"]);
}

#[test]
fn shared_module_kept_at_first_activation() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.manifest"), "").unwrap();
    fs::create_dir(temp.path().join("b")).unwrap();
    fs::write(temp.path().join("main.c"), "").unwrap();
    let store = MemoryModuleStore::new("memory")
        .with_module("mod1", "one")
        .with_module("mod3", "three")
        .with_module("mod4", "four");
    let primer = primer_with(store);

    let result = primer.run(temp.path());

    assert_eq!(result.module_ids(), vec!["mod1", "mod3", "mod4"]);
    assert_eq!(result.document, "one\n\n---\n\nthree\n\n---\n\nfour");
    assert_eq!(result.metadata.activated, 3);
}

#[test]
fn skip_wins_over_additional() {
    let temp = TempDir::new().unwrap();
    write_overrides(
        temp.path(),
        "skip = [\"mod2\"]\nadditional = [\"mod2\"]\n",
    );
    let primer = primer_with(MemoryModuleStore::new("memory").with_module("mod2", "Y"));

    let result = primer.run(temp.path());

    assert!(result.module_ids().is_empty());
    assert_eq!(result.document, "");
}

#[test]
fn broken_overrides_file_is_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.manifest"), "").unwrap();
    write_overrides(temp.path(), "skip = [unterminated\n");
    let primer = primer_with(MemoryModuleStore::new("memory").with_module("mod1", "X"));

    let result = primer.run(temp.path());

    assert_eq!(result.module_ids(), vec!["mod1"]);
    assert_eq!(result.metadata.warnings.len(), 1);
}

#[test]
fn repeated_runs_are_deterministic() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Cargo.toml"), "").unwrap();
    fs::write(temp.path().join("Makefile"), "").unwrap();
    fs::create_dir(temp.path().join("tests")).unwrap();

    let home = TempDir::new().unwrap();
    let mut config = Config::default();
    config.modules.dir = Some(home.path().to_path_buf());
    let primer = Primer::from_config(&config, temp.path()).unwrap();

    let first = primer.run(temp.path());
    let second = primer.run(temp.path());

    assert_eq!(first.module_ids(), vec!["rust", "make", "testing"]);
    assert_eq!(first.module_ids(), second.module_ids());
    assert_eq!(first.document, second.document);
    assert!(first.metadata.unresolved.is_empty());
}
