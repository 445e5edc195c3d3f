//! Id lookup over the catalog

use crate::models::resource_id;
use crate::models::{Resource, ResourceKind};
use std::collections::{BTreeMap, HashMap};

/// Read-only lookup view over a catalog's resources
#[derive(Debug, Clone, Copy)]
pub struct NodeIndex<'a> {
    resources: &'a BTreeMap<String, Resource>,
    lookup: &'a HashMap<String, String>,
}

impl<'a> NodeIndex<'a> {
    pub(super) fn new(
        resources: &'a BTreeMap<String, Resource>,
        lookup: &'a HashMap<String, String>,
    ) -> Self {
        Self { resources, lookup }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resolve an id exactly or case-insensitively
    pub fn resolve(&self, reference: &str) -> Option<&'a Resource> {
        if let Some(resource) = self.resources.get(reference) {
            return Some(resource);
        }
        self.lookup
            .get(&resource_id::normalize(reference))
            .and_then(|id| self.resources.get(id))
    }

    /// Resolve an id, or the nearest enclosing resource for sub-resource ids
    /// such as load balancer backend pools or NIC ip configurations
    pub fn resolve_nearest(&self, reference: &str) -> Option<&'a Resource> {
        let mut current = reference.to_string();
        loop {
            if let Some(resource) = self.resolve(&current) {
                return Some(resource);
            }
            current = resource_id::parent_id(&current)?;
        }
    }

    /// Resources of one kind, ordered by id
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources
            .values()
            .filter(move |resource| resource.is_kind(kind))
    }

    /// Storage accounts are addressed by globally unique name in blob endpoints
    pub fn storage_account_named(&self, name: &str) -> Option<&'a Resource> {
        self.of_kind(ResourceKind::StorageAccount)
            .find(|account| account.name.eq_ignore_ascii_case(name))
    }

    /// All resources ordered by id
    pub fn resources(&self) -> impl Iterator<Item = &'a Resource> + 'a {
        self.resources.values()
    }
}
