//! Git integration for the vendored icon-set submodule.
//!
//! - **CommandRunner**: process boundary, with [`ShellRunner`] as the real implementation
//! - **bootstrap**: `git submodule update --init --recursive` when icons are missing
//! - **SubmoduleSync**: fetch, pull and commit new upstream icon commits

pub mod command;
pub mod submodule;

pub use command::{CommandRunner, CommandSpec, ShellRunner};
pub use submodule::{bootstrap, bootstrap_command, SubmoduleSync, SyncOutcome};
