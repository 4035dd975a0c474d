//! Layered module store.
//!
//! Tries each layer in order; the first layer holding an identifier wins.
//! Used to let project and user module files shadow the built-in table.

use std::collections::BTreeSet;

use crate::modules::traits::{Module, ModuleStore};

/// A store that consults several stores in priority order.
pub struct LayeredModuleStore {
    layers: Vec<Box<dyn ModuleStore>>,
}

impl LayeredModuleStore {
    /// Create a store from layers, highest priority first.
    pub fn new(layers: Vec<Box<dyn ModuleStore>>) -> Self {
        Self { layers }
    }

    /// Layer names, highest priority first.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    /// Every layer that holds `id`, highest priority first.
    ///
    /// The first entry is the one [`resolve`](ModuleStore::resolve) returns;
    /// the rest are shadowed.
    pub fn providers(&self, id: &str) -> Vec<&str> {
        self.layers
            .iter()
            .filter(|l| l.contains(id))
            .map(|l| l.name())
            .collect()
    }
}

impl std::fmt::Debug for LayeredModuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredModuleStore")
            .field("layers", &self.layer_names())
            .finish()
    }
}

impl ModuleStore for LayeredModuleStore {
    fn name(&self) -> &str {
        "layered"
    }

    fn resolve(&self, id: &str) -> Option<Module> {
        self.layers.iter().find_map(|layer| layer.resolve(id))
    }

    fn ids(&self) -> Vec<String> {
        let ids: BTreeSet<String> = self.layers.iter().flat_map(|l| l.ids()).collect();
        ids.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::MemoryModuleStore;

    fn layered() -> LayeredModuleStore {
        let project = MemoryModuleStore::new("project").with_module("rust", "project rust");
        let user = MemoryModuleStore::new("user")
            .with_module("rust", "user rust")
            .with_module("go", "user go");
        LayeredModuleStore::new(vec![
            Box::new(project),
            Box::new(user),
            Box::new(MemoryModuleStore::builtin()),
        ])
    }

    #[test]
    fn test_first_layer_wins() {
        let store = layered();
        let rust = store.resolve("rust").unwrap();
        assert_eq!(rust.body, "project rust");
        assert_eq!(rust.origin, "project");

        let go = store.resolve("go").unwrap();
        assert_eq!(go.origin, "user");

        let docker = store.resolve("docker").unwrap();
        assert_eq!(docker.origin, "builtin");
    }

    #[test]
    fn test_miss_in_every_layer() {
        assert!(layered().resolve("cobol").is_none());
    }

    #[test]
    fn test_ids_are_union_sorted_unique() {
        let ids = layered().ids();
        assert_eq!(ids.iter().filter(|id| *id == "rust").count(), 1);
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&"go".to_string()));
    }

    #[test]
    fn test_providers() {
        let store = layered();
        assert_eq!(store.providers("rust"), vec!["project", "user", "builtin"]);
        assert_eq!(store.providers("docker"), vec!["builtin"]);
        assert!(store.providers("cobol").is_empty());
    }

    #[test]
    fn test_empty_layers() {
        let store = LayeredModuleStore::new(Vec::new());
        assert!(store.resolve("rust").is_none());
        assert!(store.ids().is_empty());
        assert!(store.layer_names().is_empty());
    }
}
