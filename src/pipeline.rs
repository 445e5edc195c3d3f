//! End-to-end export: records in, annotated graph out

use crate::catalog::{CatalogError, ResourceCatalog};
use crate::config::Config;
use crate::filter::{FilterEngine, FilterError};
use crate::graph::{GraphAssembler, Subgraph};
use crate::layout::{AnnotatedGraph, LayoutAnnotator};
use crate::models::RawResource;
use crate::resolver::{RelationshipResolver, UnresolvedReference};
use serde::Serialize;
use std::fmt;

/// Export failures; both are fatal
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExportError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Non-fatal conditions collected during an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Warning {
    UnresolvedReference(UnresolvedReference),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedReference(reference) => write!(f, "{}", reference),
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub graph: AnnotatedGraph,
    pub warnings: Vec<Warning>,
}

/// Catalog, resolve, filter, assemble and annotate in one pass
///
/// The filter is compiled before anything else, so an invalid pattern fails
/// without touching the records.
pub fn export_graph<I>(records: I, config: &Config) -> Result<ExportOutcome, ExportError>
where
    I: IntoIterator<Item = RawResource>,
{
    let filter = FilterEngine::new(&config.filter)?;
    let catalog = ResourceCatalog::ingest(records, &config.catalog)?;

    let resolution = RelationshipResolver::new().resolve(&catalog);
    let warnings = resolution
        .unresolved
        .into_iter()
        .map(Warning::UnresolvedReference)
        .collect();

    let subgraph = Subgraph::new(catalog.into_nodes(), resolution.edges);
    let filtered = filter.apply(subgraph);
    let graph = GraphAssembler::assemble(filtered);
    let annotated = LayoutAnnotator::new(&config.layout).annotate(graph);

    Ok(ExportOutcome {
        graph: annotated,
        warnings,
    })
}
