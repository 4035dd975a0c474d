//! Module stores for Primer.
//!
//! Stores map a module identifier to its content:
//! - **memory**: in-memory table, including the built-in modules
//! - **dir**: one `<id>.md` file per module
//! - **layered**: several stores in priority order

mod builtin;
pub mod dir;
pub mod layered;
pub mod memory;
pub mod traits;

pub use dir::{is_valid_module_id, DirModuleStore};
pub use layered::LayeredModuleStore;
pub use memory::MemoryModuleStore;
pub use traits::{Module, ModuleStore};
