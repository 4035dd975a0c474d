//! Module store trait.
//!
//! A store maps a module identifier to its content. A miss is not an error:
//! callers record it and render a placeholder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A named block of guidance text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier.
    pub id: String,
    /// Content, emitted verbatim.
    pub body: String,
    /// Name of the store that supplied the module.
    pub origin: String,
}

impl Module {
    /// Create a new module.
    pub fn new(id: impl Into<String>, body: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            origin: origin.into(),
        }
    }
}

/// Trait for module content sources.
pub trait ModuleStore: Send + Sync {
    /// Short store name, recorded as [`Module::origin`].
    fn name(&self) -> &str;

    /// Look up a module by identifier.
    ///
    /// Returns `None` when the store has no such module, including when the
    /// underlying source could not be read.
    fn resolve(&self, id: &str) -> Option<Module>;

    /// List every identifier the store can resolve, sorted.
    fn ids(&self) -> Vec<String>;

    /// Check if the store can resolve an identifier.
    fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }
}

impl<T: ModuleStore + ?Sized> ModuleStore for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, id: &str) -> Option<Module> {
        (**self).resolve(id)
    }

    fn ids(&self) -> Vec<String> {
        (**self).ids()
    }
}

impl<T: ModuleStore + ?Sized> ModuleStore for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn resolve(&self, id: &str) -> Option<Module> {
        (**self).resolve(id)
    }

    fn ids(&self) -> Vec<String> {
        (**self).ids()
    }
}
