//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod export;
mod logging;

pub use commands::{ConfigSubcommand, display_version, handle_config_command};
pub use export::{ExportArgs, handle_export_command};
pub use logging::*;
