//! Command-line interface for iconforge.
//!
//! Provides the `build`, `update` and `package` commands.

mod commands;

pub use commands::{
    build_config, build_config_with, package_config_with, parse_cli, run_with_cli, BuildArgs, Cli,
    Commands, PackageArgs, UpdateArgs,
};
