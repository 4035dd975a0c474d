//! Unified error types for Primer with fail-open philosophy.
//!
//! Anything that goes wrong while inspecting a particular project (an
//! unreadable marker, a broken override file, a missing module) degrades to a
//! safe default and is reported. Only a broken rule table or module store
//! configuration is fatal, and only at startup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Primer operations.
#[derive(Error, Debug)]
pub enum PrimerError {
    /// I/O errors while reading markers, modules, or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// The authored rule table is malformed.
    #[error("rule error in '{rule}': {message}")]
    Rules { rule: String, message: String },

    /// The project override file could not be read or parsed.
    #[error("override error at {path}: {message}")]
    Overrides { path: PathBuf, message: String },

    /// The module store is misconfigured.
    #[error("module store error: {message}")]
    ModuleStore { message: String },

    /// JSON or TOML serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },
}

/// A specialized Result type for Primer operations.
pub type Result<T> = std::result::Result<T, PrimerError>;

impl PrimerError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a rule table error for the named rule.
    pub fn rules(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rules {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create an override file error.
    pub fn overrides(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Overrides {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a module store error.
    pub fn module_store(message: impl Into<String>) -> Self {
        Self::ModuleStore {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Check if this error is fatal at startup.
    ///
    /// A broken rule table, config, or module store means the tool itself is
    /// misconfigured. Everything else is a property of the inspected project
    /// and must degrade gracefully.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Rules { .. } | Self::Config { .. } | Self::ModuleStore { .. }
        )
    }
}

impl From<io::Error> for PrimerError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PrimerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and return a safe default instead of propagating it.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the Primer CLI.
pub mod exit_codes {
    /// Composition completed (possibly with warnings).
    pub const SUCCESS: i32 = 0;

    /// A command could not complete (e.g. `init` failed to write).
    pub const FAILURE: i32 = 1;

    /// The rule table, module store, or config is broken.
    pub const CONFIG_ERROR: i32 = 2;

    /// Panic.
    pub const CRASH: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = PrimerError::storage(
            "/tmp/overrides.toml",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/overrides.toml"));
    }

    #[test]
    fn test_rules_error_display() {
        let err = PrimerError::rules("rust", "no modules listed");
        assert_eq!(err.to_string(), "rule error in 'rust': no modules listed");
    }

    #[test]
    fn test_overrides_error_display() {
        let err = PrimerError::overrides("/p/.primer/overrides.toml", "expected array");
        assert_eq!(
            err.to_string(),
            "override error at /p/.primer/overrides.toml: expected array"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = PrimerError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_module_store_error_display() {
        let err = PrimerError::module_store("not a directory");
        assert_eq!(err.to_string(), "module store error: not a directory");
    }

    #[test]
    fn test_is_fatal() {
        assert!(PrimerError::rules("r", "m").is_fatal());
        assert!(PrimerError::config("m").is_fatal());
        assert!(PrimerError::module_store("m").is_fatal());

        assert!(!PrimerError::overrides("p", "m").is_fatal());
        assert!(!PrimerError::serde("m").is_fatal());
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(!PrimerError::storage("p", io_err).is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: PrimerError = io_err.into();
        assert!(matches!(err, PrimerError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: PrimerError = json_err.into();
        assert!(matches!(err, PrimerError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(PrimerError::config("test"));
        let value = result.fail_open_default("test context");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<i32> = Err(PrimerError::serde("test"));
        assert_eq!(result.fail_open_with("test context", 42), 42);
    }

    #[test]
    fn test_fail_open_success() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_default("test context"), 100);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::FAILURE, 1);
        assert_eq!(exit_codes::CONFIG_ERROR, 2);
        assert_eq!(exit_codes::CRASH, 3);
    }
}
