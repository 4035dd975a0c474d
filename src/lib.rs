//! Primer - project-aware context composition
//!
//! Primer inspects a project directory for well-known markers (manifests,
//! directories, file contents, glob patterns), maps what it finds to a set of
//! instruction modules, applies per-project skip/additional overrides, and
//! renders the result as one document.

pub mod cli;
pub mod compose;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod modules;
pub mod util;

pub use compose::{
    ComposedModule, Composer, CompositionMetadata, CompositionResult, OverrideLoader,
    OverrideSpec,
};
pub use config::Config;
pub use discovery::{
    Condition, Detector, Marker, MarkerProbe, ModuleList, Predicate, Rule, RuleDef, RuleMatch,
    RuleSet,
};
pub use engine::Primer;
pub use error::{PrimerError, Result};
pub use modules::{DirModuleStore, LayeredModuleStore, MemoryModuleStore, Module, ModuleStore};

// CLI commands
pub use cli::{ComposeCommand, DetectCommand, InitCommand, ModulesCommand, RulesCommand};
