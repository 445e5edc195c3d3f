//! Resource catalog
//!
//! Normalizes raw resource records into immutable [`Resource`] values keyed by
//! id, and exposes a [`NodeIndex`] that relationship strategies use to resolve
//! the ARM ids they find in resource properties.

mod index;

pub use index::NodeIndex;

use crate::config::CatalogConfig;
use crate::models::resource_id;
use crate::models::{PowerState, RawResource, Resource, ResourceKind};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Catalog errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error(
        "Duplicate resource id {id}: already ingested as {existing_type} in {existing_group}, \
         conflicting record is {conflicting_type} in {conflicting_group}"
    )]
    DuplicateResource {
        id: String,
        existing_type: String,
        existing_group: String,
        conflicting_type: String,
        conflicting_group: String,
    },

    #[error("Invalid resource record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Normalized resources keyed by id
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    resources: BTreeMap<String, Resource>,
    /// lowercase id -> stored id
    lookup: HashMap<String, String>,
}

impl ResourceCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest an ordered sequence of raw records
    pub fn ingest<I>(records: I, config: &CatalogConfig) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = RawResource>,
    {
        let mut catalog = Self::new();
        for (index, raw) in records.into_iter().enumerate() {
            let resource = normalize_record(index, raw)?;
            let embedded = if config.expand_subnets && resource.is_kind(ResourceKind::VirtualNetwork)
            {
                embedded_subnets(&resource)
            } else {
                Vec::new()
            };
            catalog.insert(resource)?;
            for subnet in embedded {
                // a subnet record ingested earlier keeps its own details
                if !catalog.contains(&subnet.id) {
                    catalog.insert(subnet)?;
                }
            }
        }
        tracing::info!("Catalog holds {} resources", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from already normalized resources
    pub fn from_resources<I>(resources: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = Resource>,
    {
        let mut catalog = Self::new();
        for resource in resources {
            catalog.insert(resource)?;
        }
        Ok(catalog)
    }

    /// Insert a resource; re-inserting an unchanged id is a no-op
    pub fn insert(&mut self, resource: Resource) -> CatalogResult<()> {
        let key = resource_id::normalize(&resource.id);
        if let Some(existing_id) = self.lookup.get(&key) {
            let existing = &self.resources[existing_id];
            let same_type = existing
                .resource_type
                .eq_ignore_ascii_case(&resource.resource_type);
            let same_group = existing
                .resource_group
                .eq_ignore_ascii_case(&resource.resource_group);
            if !same_type || !same_group {
                return Err(CatalogError::DuplicateResource {
                    id: resource.id,
                    existing_type: existing.resource_type.clone(),
                    existing_group: existing.resource_group.clone(),
                    conflicting_type: resource.resource_type,
                    conflicting_group: resource.resource_group,
                });
            }
            if existing != &resource {
                tracing::debug!(
                    "Ignoring repeated record for {} with differing details, keeping the first",
                    resource.id
                );
            }
            return Ok(());
        }

        self.lookup.insert(key, resource.id.clone());
        self.resources.insert(resource.id.clone(), resource);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(&resource_id::normalize(id))
    }

    /// Exact-id access
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Resources ordered by id
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Lookup view used by relationship strategies
    pub fn index(&self) -> NodeIndex<'_> {
        NodeIndex::new(&self.resources, &self.lookup)
    }

    /// Hand the node set over to the next stage
    pub fn into_nodes(self) -> BTreeMap<String, Resource> {
        self.resources
    }
}

fn normalize_record(index: usize, raw: RawResource) -> CatalogResult<Resource> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(CatalogError::InvalidRecord {
            index,
            reason: "missing id".to_string(),
        });
    }

    let resource_group = raw
        .resource_group
        .filter(|g| !g.is_empty())
        .or_else(|| resource_id::resource_group_of(&id).map(str::to_string))
        .ok_or_else(|| CatalogError::InvalidRecord {
            index,
            reason: format!("no resource group in record or id {}", id),
        })?;

    let subscription_id = raw
        .subscription_id
        .filter(|s| !s.is_empty())
        .or_else(|| resource_id::subscription_of(&id).map(str::to_string))
        .unwrap_or_default();

    let name = raw
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| resource_id::last_segment(&id).to_string());

    let properties = raw.properties.unwrap_or(Value::Null);
    let power_state = raw
        .power_state
        .as_deref()
        .map(PowerState::from_code)
        .or_else(|| PowerState::from_properties(&properties));

    Ok(Resource {
        id,
        name,
        resource_type: raw.resource_type,
        resource_group,
        subscription_id,
        location: raw.location.unwrap_or_default(),
        tags: raw.tags.map(normalize_tags).unwrap_or_default(),
        power_state,
        properties,
        identity: raw.identity.filter(|i| !i.is_null()),
    })
}

/// Null tags are dropped, other non-string values keep their JSON text
fn normalize_tags(tags: BTreeMap<String, Value>) -> BTreeMap<String, String> {
    tags.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((key, text)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

/// Subnets that ARM embeds in a virtual network's `properties.subnets`
fn embedded_subnets(vnet: &Resource) -> Vec<Resource> {
    let Some(subnets) = vnet
        .properties
        .get("subnets")
        .and_then(|s| s.as_array())
    else {
        return Vec::new();
    };

    subnets
        .iter()
        .filter_map(|subnet| {
            let id = subnet.get("id").and_then(|i| i.as_str())?;
            let name = subnet
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .or_else(|| resource_id::nested_name(id))
                .unwrap_or_else(|| resource_id::last_segment(id).to_string());
            tracing::debug!("Expanding embedded subnet {} of {}", id, vnet.id);
            Some(Resource {
                id: id.to_string(),
                name,
                resource_type: ResourceKind::Subnet.as_str().to_string(),
                resource_group: vnet.resource_group.clone(),
                subscription_id: vnet.subscription_id.clone(),
                location: vnet.location.clone(),
                tags: Default::default(),
                power_state: None,
                properties: subnet.get("properties").cloned().unwrap_or(Value::Null),
                identity: None,
            })
        })
        .collect()
}
