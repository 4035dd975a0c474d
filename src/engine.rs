//! The detection and composition pipeline.
//!
//! [`Primer::from_config`] assembles the rule set and module store; this is
//! the only place a configuration problem can stop a run. [`Primer::run`]
//! then inspects a directory and always produces a result.

use std::path::{Path, PathBuf};

use crate::compose::{Composer, CompositionResult, OverrideLoader};
use crate::config::{project_modules_dir, project_rules_path, user_modules_dir, Config};
use crate::discovery::{Detector, MarkerProbe, RuleSet};
use crate::error::{PrimerError, Result};
use crate::modules::{DirModuleStore, LayeredModuleStore, MemoryModuleStore, ModuleStore};

/// A configured pipeline.
#[derive(Debug)]
pub struct Primer {
    detector: Detector,
    store: LayeredModuleStore,
    overrides: OverrideLoader,
    composer: Composer,
}

impl Primer {
    /// Assemble the pipeline from configuration.
    ///
    /// `target` locates project-local rules and modules.
    ///
    /// # Errors
    ///
    /// Fails if the rule table or a module directory is misconfigured.
    pub fn from_config(config: &Config, target: &Path) -> Result<Self> {
        let rules = build_rule_set(config, target)?;
        let store = build_module_store(config, target)?;

        tracing::debug!(
            rules = rules.len(),
            layers = ?store.layer_names(),
            "pipeline assembled"
        );

        Ok(Self {
            detector: Detector::new(rules, MarkerProbe::new(config.probe.clone())),
            store,
            overrides: OverrideLoader::new(),
            composer: Composer::new(config.render.clone()),
        })
    }

    /// Assemble a pipeline from explicit parts.
    pub fn new(
        detector: Detector,
        store: LayeredModuleStore,
        overrides: OverrideLoader,
        composer: Composer,
    ) -> Self {
        Self {
            detector,
            store,
            overrides,
            composer,
        }
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn rules(&self) -> &RuleSet {
        self.detector.rules()
    }

    pub fn store(&self) -> &LayeredModuleStore {
        &self.store
    }

    /// Detect, apply overrides, and compose for `target`.
    pub fn run(&self, target: &Path) -> CompositionResult {
        let detected = self.detector.detect(target);
        let (overrides, warning) = self.overrides.load_with_warning(target);

        let mut result = self.composer.compose(&detected, &overrides, &self.store);
        if let Some(warning) = warning {
            result.metadata.warnings.push(warning);
        }
        result
    }
}

/// Resolve a configured path against the target directory.
fn resolve_path(target: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        target.join(path)
    }
}

/// Build the effective rule set.
///
/// The extra rules file is `rules.path` when configured (it must exist), else
/// `.primer/rules.toml` when present. Extra rules run after the built-in ones
/// unless `rules.include_builtin` is false.
pub fn build_rule_set(config: &Config, target: &Path) -> Result<RuleSet> {
    let extra_path = match &config.rules.path {
        Some(path) => {
            let path = resolve_path(target, path);
            if !path.is_file() {
                return Err(PrimerError::config(format!(
                    "rules file not found: {}",
                    path.display()
                )));
            }
            Some(path)
        }
        None => Some(project_rules_path(target)).filter(|p| p.is_file()),
    };

    let extra = match extra_path {
        Some(path) => Some(RuleSet::load_file(&path)?),
        None => None,
    };

    let rules = match (config.rules.include_builtin, extra) {
        (true, Some(extra)) => RuleSet::builtin()?.extend(extra)?,
        (true, None) => RuleSet::builtin()?,
        (false, Some(extra)) => extra,
        (false, None) => {
            tracing::warn!("built-in rules disabled and no rules file found; nothing will be detected");
            RuleSet::default()
        }
    };

    Ok(rules)
}

/// Build the layered module store: project, then user, then built-in.
pub fn build_module_store(config: &Config, target: &Path) -> Result<LayeredModuleStore> {
    let mut layers: Vec<Box<dyn ModuleStore>> = vec![Box::new(DirModuleStore::open(
        "project",
        project_modules_dir(target),
    )?)];

    let user_dir = config
        .modules
        .dir
        .as_ref()
        .map(|dir| resolve_path(target, dir))
        .or_else(user_modules_dir);
    if let Some(dir) = user_dir {
        layers.push(Box::new(DirModuleStore::open("user", dir)?));
    }

    layers.push(Box::new(MemoryModuleStore::builtin()));

    Ok(LayeredModuleStore::new(layers))
}
