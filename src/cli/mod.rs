//! CLI commands for Primer.
//!
//! - **compose**: run detection and composition, print the document
//! - **detect**: show matched rules and activated modules
//! - **rules**: list the effective rule table
//! - **modules**: list available modules and their origin
//! - **init**: scaffold the project `.primer/` directory

pub mod compose_cmd;
pub mod detect_cmd;
pub mod init;
pub mod modules_cmd;
pub mod rules_cmd;

pub use compose_cmd::ComposeCommand;
pub use detect_cmd::DetectCommand;
pub use init::InitCommand;
pub use modules_cmd::ModulesCommand;
pub use rules_cmd::RulesCommand;
