//! Export command

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use azgraph::config::{Config, ConfigLoader};
use azgraph::layout::LabelVerbosity;
use azgraph::source::{self, ResourceProvider, SnapshotFileProvider};
use azgraph::{AnnotatedGraph, export_graph};

/// Output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Outline,
}

/// Arguments of `azgraph export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Snapshot files (JSON array or `{ "value": [...] }`), loaded concurrently
    #[arg(long, short = 'i', required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Only include these resource groups
    #[arg(long = "resource-group", short = 'g')]
    resource_groups: Vec<String>,

    /// Exclude resource types matching a wildcard pattern (e.g. "*.subnets")
    #[arg(long)]
    exclude: Vec<String>,

    /// Keep only compute resources and what they use
    #[arg(long)]
    compute_only: bool,

    /// Maximum hops from a compute resource
    #[arg(long)]
    max_depth: Option<usize>,

    /// Node label detail
    #[arg(long, value_parser = parse_verbosity)]
    verbosity: Option<LabelVerbosity>,

    /// Do not expose VM power state
    #[arg(long)]
    no_power_state: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn parse_verbosity(value: &str) -> Result<LabelVerbosity, String> {
    value.parse()
}

impl ExportArgs {
    /// CLI flags are the last configuration layer
    fn apply_to(&self, config: &mut Config) {
        if !self.resource_groups.is_empty() {
            config.filter.include_resource_groups = self.resource_groups.clone();
        }
        config
            .filter
            .exclude_patterns
            .extend(self.exclude.iter().cloned());
        if self.compute_only {
            config.filter.compute_only = true;
        }
        if self.max_depth.is_some() {
            config.filter.max_depth = self.max_depth;
        }
        if let Some(verbosity) = self.verbosity {
            config.layout.label_verbosity = verbosity;
        }
        if self.no_power_state {
            config.layout.show_power_state = false;
        }
    }
}

/// Run an export and write the result
pub async fn handle_export_command(args: ExportArgs) -> Result<()> {
    let mut config = ConfigLoader::load().context("Failed to load configuration")?;
    args.apply_to(&mut config);
    tracing::debug!("Effective configuration: {:?}", config);

    let providers: Vec<Box<dyn ResourceProvider>> = args
        .input
        .iter()
        .map(|path| Box::new(SnapshotFileProvider::new(path)) as Box<dyn ResourceProvider>)
        .collect();
    let records = source::collect(&providers).await?;

    let outcome = export_graph(records, &config).context("Export failed")?;
    for warning in &outcome.warnings {
        tracing::warn!("{}", warning);
    }
    if outcome.graph.is_empty() {
        eprintln!("No resources matched");
    }

    let rendered = render(&outcome.graph, args.format)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!(
                "Wrote {} nodes, {} edges to {}",
                outcome.graph.nodes().len(),
                outcome.graph.edges().len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn render(graph: &AnnotatedGraph, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let mut json = graph.to_json().context("Failed to serialize graph as JSON")?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => graph.to_yaml().context("Failed to serialize graph as YAML")?,
        OutputFormat::Outline => graph.to_string(),
    })
}
