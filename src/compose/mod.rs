//! Composition for Primer.
//!
//! Turns detected module identifiers, project overrides, and a module store
//! into one rendered document plus metadata.

pub mod composer;
pub mod overrides;

pub use composer::{ComposedModule, Composer, CompositionMetadata, CompositionResult};
pub use overrides::{write_override_template, OverrideLoader, OverrideSpec, OVERRIDE_TEMPLATE};
