//! Directory-backed module store.
//!
//! Each module is a file named `<id>.md` directly inside the directory.
//! Identifiers that could name anything outside the directory never
//! resolve.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrimerError, Result};
use crate::modules::traits::{Module, ModuleStore};
use crate::util::read_to_string_limited;

/// File extension of module files.
pub const MODULE_EXTENSION: &str = "md";

/// Check that an identifier is safe to use as a file stem.
pub fn is_valid_module_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !id.contains("..")
}

/// Module store reading `<dir>/<id>.md`.
#[derive(Debug, Clone)]
pub struct DirModuleStore {
    name: String,
    dir: PathBuf,
}

impl DirModuleStore {
    /// Create a store over `dir`.
    ///
    /// A missing directory is an empty store. A path that exists but is not a
    /// directory is a configuration error.
    pub fn open(name: impl Into<String>, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.exists() && !dir.is_dir() {
            return Err(PrimerError::module_store(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        Ok(Self {
            name: name.into(),
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn module_path(&self, id: &str) -> Option<PathBuf> {
        if !is_valid_module_id(id) {
            return None;
        }
        Some(self.dir.join(format!("{id}.{MODULE_EXTENSION}")))
    }
}

impl ModuleStore for DirModuleStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, id: &str) -> Option<Module> {
        let path = self.module_path(id)?;
        if !path.is_file() {
            return None;
        }
        match read_to_string_limited(&path) {
            Ok(body) => Some(Module::new(id, body, self.name.clone())),
            Err(e) => {
                tracing::warn!(module = id, error = %e, "module file unreadable");
                None
            }
        }
    }

    fn ids(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == MODULE_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .filter(|id| is_valid_module_id(id))
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::traits::tests::test_module_store_contract;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, DirModuleStore) {
        let temp = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(temp.path().join(name), body).unwrap();
        }
        let store = DirModuleStore::open("project", temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn test_dir_store_contract() {
        let (_temp, store) = store_with(&[("mod1.md", "X"), ("other.md", "Y")]);
        test_module_store_contract(&store, "mod1", "mod2");
    }

    #[test]
    fn test_body_is_verbatim() {
        let (_temp, store) = store_with(&[("rust.md", "## Ours\n\ntrailing\n")]);
        assert_eq!(store.resolve("rust").unwrap().body, "## Ours\n\ntrailing\n");
    }

    #[test]
    fn test_ids_ignore_other_files() {
        let (temp, store) = store_with(&[("b.md", ""), ("a.md", ""), ("notes.txt", "")]);
        fs::create_dir(temp.path().join("dir.md")).unwrap();
        assert_eq!(store.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = DirModuleStore::open("user", temp.path().join("absent")).unwrap();
        assert!(store.ids().is_empty());
        assert!(store.resolve("rust").is_none());
    }

    #[test]
    fn test_file_path_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("modules");
        fs::write(&file, "").unwrap();
        let err = DirModuleStore::open("user", &file).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_traversal_ids_never_resolve() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("secret.md"), "s").unwrap();
        let inner = temp.path().join("modules");
        fs::create_dir(&inner).unwrap();
        let store = DirModuleStore::open("project", &inner).unwrap();

        assert!(store.resolve("../secret").is_none());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("").is_none());
    }

    #[test]
    fn test_is_valid_module_id() {
        assert!(is_valid_module_id("rust"));
        assert!(is_valid_module_id("ci-github_v2"));
        assert!(is_valid_module_id("lang.rust"));
        assert!(!is_valid_module_id(""));
        assert!(!is_valid_module_id(".hidden"));
        assert!(!is_valid_module_id("a/b"));
        assert!(!is_valid_module_id("a\\b"));
        assert!(!is_valid_module_id("a..b"));
    }
}
