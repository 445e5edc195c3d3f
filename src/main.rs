//! azgraph - Azure resource relationship graphs
//!
//! Reads resource snapshots, infers how the resources depend on each other
//! and writes a clustered, layout-annotated graph for a renderer to draw.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigSubcommand, ExportArgs};

/// azgraph - Azure resource relationship graphs
#[derive(Parser, Debug)]
#[command(name = "azgraph")]
#[command(about = "Infer relationships between Azure resources and export a clustered graph", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Build a graph from resource snapshots
    Export(ExportArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    match args.command {
        Command::Export(export) => cli::handle_export_command(export).await,
        Command::Config { subcommand } => cli::handle_config_command(subcommand),
        Command::Version => {
            cli::display_version();
            Ok(())
        }
    }
}
