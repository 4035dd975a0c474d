//! Discovery module for Primer.
//!
//! This module handles stack detection:
//! - Filesystem markers and the probe that evaluates them
//! - The authored rule table and its compiled form
//! - The detector that folds rules into an ordered module list
//!
//! The built-in rule table can be extended or replaced per project.

pub mod detector;
pub mod marker;
pub mod rules;

pub use detector::{Detector, ModuleList, RuleMatch};
pub use marker::{Marker, MarkerProbe};
pub use rules::{Condition, Predicate, Rule, RuleDef, RuleSet};
