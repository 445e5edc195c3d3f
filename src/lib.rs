//! azgraph library
//!
//! Turns a flat list of Azure resource records into a labeled, clustered
//! relationship graph ready for an external renderer. The binary wraps this
//! library; tests drive it directly.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod source;

// Re-export commonly used types for convenience
pub use catalog::{CatalogError, NodeIndex, ResourceCatalog};
pub use config::{CatalogConfig, Config, FilterConfig, LayoutConfig};
pub use filter::{FilterEngine, FilterError, FilterPattern};
pub use graph::{Graph, GraphAssembler, Relationship, RelationshipKind, Subgraph};
pub use layout::{AnnotatedGraph, LabelVerbosity, LayoutAnnotator};
pub use models::{PowerState, RawResource, Resource, ResourceCategory, ResourceKind};
pub use pipeline::{ExportError, ExportOutcome, Warning, export_graph};
pub use resolver::{RelationshipResolver, Resolution, UnresolvedReference};
pub use source::{ResourceProvider, SnapshotFileProvider};
