//! In-memory module store.
//!
//! Backs the built-in module table and is handy in tests.

use std::collections::BTreeMap;

use crate::modules::builtin::BUILTIN_MODULES;
use crate::modules::traits::{Module, ModuleStore};

/// Module store backed by an in-memory table.
#[derive(Debug, Clone)]
pub struct MemoryModuleStore {
    name: String,
    modules: BTreeMap<String, String>,
}

impl MemoryModuleStore {
    /// Create an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: BTreeMap::new(),
        }
    }

    /// The store holding the built-in modules.
    pub fn builtin() -> Self {
        BUILTIN_MODULES
            .iter()
            .fold(Self::new("builtin"), |store, (id, body)| {
                store.with_module(*id, *body)
            })
    }

    /// Add a module, replacing any existing body for the identifier.
    pub fn insert(&mut self, id: impl Into<String>, body: impl Into<String>) {
        self.modules.insert(id.into(), body.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_module(mut self, id: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(id, body);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleStore for MemoryModuleStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, id: &str) -> Option<Module> {
        self.modules
            .get(id)
            .map(|body| Module::new(id, body.clone(), self.name.clone()))
    }

    fn ids(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }
}
