//! Per-type relationship inference strategies
//!
//! Each strategy is a pure function over the subject resource and the catalog
//! index. Strategies never create resources: a reference that does not
//! resolve is reported through [`Inference::missing`] and otherwise ignored.

use super::Inference;
use super::references::{EACH, scan_resource_ids, storage_account_from_uri, strings_at};
use crate::catalog::NodeIndex;
use crate::graph::RelationshipKind;
use crate::models::resource_id;
use crate::models::{Resource, ResourceKind};
use std::collections::HashMap;

/// A relationship inference function
pub type Strategy = fn(&Resource, &NodeIndex<'_>, &mut Inference);

/// Mapping from resource kind to the ordered strategies run for it, plus the
/// strategies run for every resource regardless of type
#[derive(Clone)]
pub struct StrategyTable {
    by_kind: HashMap<ResourceKind, Vec<Strategy>>,
    universal: Vec<Strategy>,
}

impl StrategyTable {
    /// A table with no strategies at all
    pub fn empty() -> Self {
        Self {
            by_kind: HashMap::new(),
            universal: Vec::new(),
        }
    }

    /// Append a strategy for one resource kind
    pub fn register(&mut self, kind: ResourceKind, strategy: Strategy) -> &mut Self {
        self.by_kind.entry(kind).or_default().push(strategy);
        self
    }

    /// Append a strategy that runs for every resource
    pub fn register_universal(&mut self, strategy: Strategy) -> &mut Self {
        self.universal.push(strategy);
        self
    }

    /// Strategies for a resource: type-specific ones first, then universal ones
    pub fn strategies_for<'t>(&'t self, resource: &Resource) -> impl Iterator<Item = Strategy> + 't {
        resource
            .kind()
            .and_then(|kind| self.by_kind.get(&kind))
            .into_iter()
            .flatten()
            .chain(self.universal.iter())
            .copied()
    }
}

impl std::fmt::Debug for StrategyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.by_kind.keys().collect();
        kinds.sort();
        f.debug_struct("StrategyTable")
            .field("kinds", &kinds)
            .field("universal", &self.universal.len())
            .finish()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        use ResourceKind as K;
        let mut table = Self::empty();
        table
            .register(K::VirtualMachine, vm_disks)
            .register(K::VirtualMachine, vm_network_interfaces)
            .register(K::VirtualMachine, vm_ssh_keys)
            .register(K::VirtualMachine, diagnostics_storage)
            .register(K::VirtualMachineScaleSet, scale_set_network)
            .register(K::VirtualMachineScaleSet, diagnostics_storage)
            .register(K::NetworkInterface, nic_network)
            .register(K::Subnet, subnet_network)
            .register(K::ManagedCluster, managed_cluster_network)
            .register(K::ManagedCluster, diagnostics_storage)
            .register(K::OpenShiftCluster, openshift_network)
            .register(K::OpenShiftCluster, diagnostics_storage)
            .register(K::PrivateDnsZoneLink, dns_zone_link)
            .register(K::PrivateEndpoint, private_endpoint)
            .register(K::PrivateLinkService, private_link_service)
            .register(K::GalleryImage, gallery_parent)
            .register(K::GalleryImageVersion, gallery_parent)
            .register_universal(scan_references);
        table
    }
}

fn vm_disks(vm: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &vm.properties;
    let os_disk = strings_at(props, &["storageProfile", "osDisk", "managedDisk", "id"]);
    let data_disks = strings_at(
        props,
        &["storageProfile", "dataDisks", EACH, "managedDisk", "id"],
    );
    for disk in os_disk.into_iter().chain(data_disks) {
        inference.resolve(index, vm, disk, RelationshipKind::AttachedDisk);
    }
}

fn vm_network_interfaces(vm: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    for nic in strings_at(
        &vm.properties,
        &["networkProfile", "networkInterfaces", EACH, "id"],
    ) {
        inference.resolve(index, vm, nic, RelationshipKind::NetworkMembership);
    }
}

/// Matches inline Linux SSH keys against `sshPublicKeys` resources by key material
fn vm_ssh_keys(vm: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let key_data = strings_at(
        &vm.properties,
        &["osProfile", "linuxConfiguration", "ssh", "publicKeys", EACH, "keyData"],
    );
    if key_data.is_empty() {
        return;
    }
    for key in index.of_kind(ResourceKind::SshPublicKey) {
        let Some(public_key) = key.properties.get("publicKey").and_then(|k| k.as_str()) else {
            continue;
        };
        if key_data.iter().any(|data| *data == public_key.trim()) {
            tracing::debug!("VM {} authenticates with SSH key {}", vm.name, key.name);
            inference.link(vm, key, RelationshipKind::IdentityUsage);
        }
    }
}

/// Boot diagnostics and diagnostics settings pointing at a storage account
fn diagnostics_storage(subject: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &subject.properties;
    let uris = [
        &["diagnosticsProfile", "bootDiagnostics", "storageUri"][..],
        &[
            "virtualMachineProfile",
            "diagnosticsProfile",
            "bootDiagnostics",
            "storageUri",
        ][..],
    ];
    for path in uris {
        for uri in strings_at(props, path) {
            match storage_account_from_uri(uri).and_then(|name| index.storage_account_named(&name))
            {
                Some(account) => inference.link(subject, account, RelationshipKind::StorageDiagnostic),
                None => inference.missing(subject, uri, RelationshipKind::StorageDiagnostic),
            }
        }
    }

    let account_ids = [
        &["diagnosticsProfile", "storageAccountId"][..],
        &["diagnosticSettings", EACH, "storageAccountId"][..],
    ];
    for path in account_ids {
        for account in strings_at(props, path) {
            inference.resolve(index, subject, account, RelationshipKind::StorageDiagnostic);
        }
    }
}

fn scale_set_network(vmss: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let Some(configs) = vmss
        .properties
        .pointer("/virtualMachineProfile/networkProfile/networkInterfaceConfigurations")
    else {
        return;
    };
    let ip_configs = [EACH, "properties", "ipConfigurations", EACH, "properties"];
    for subnet in strings_at(configs, &[&ip_configs[..], &["subnet", "id"][..]].concat()) {
        inference.resolve(index, vmss, subnet, RelationshipKind::NetworkMembership);
    }
    for pool in strings_at(
        configs,
        &[&ip_configs[..], &["loadBalancerBackendAddressPools", EACH, "id"][..]].concat(),
    ) {
        inference.resolve_nearest(index, vmss, pool, RelationshipKind::NetworkMembership);
    }
    for nsg in strings_at(
        configs,
        &[EACH, "properties", "networkSecurityGroup", "id"],
    ) {
        inference.resolve(index, vmss, nsg, RelationshipKind::NetworkMembership);
    }
}

/// NIC -> subnet, public IP, NSG and load balancer
///
/// An unresolved subnet produces no edge; the containing virtual network is
/// not substituted.
fn nic_network(nic: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &nic.properties;
    let ip_configs = ["ipConfigurations", EACH, "properties"];
    for subnet in strings_at(props, &[&ip_configs[..], &["subnet", "id"][..]].concat()) {
        inference.resolve(index, nic, subnet, RelationshipKind::NetworkMembership);
    }
    for public_ip in strings_at(props, &[&ip_configs[..], &["publicIPAddress", "id"][..]].concat()) {
        inference.resolve(index, nic, public_ip, RelationshipKind::NetworkMembership);
    }
    for pool in strings_at(
        props,
        &[&ip_configs[..], &["loadBalancerBackendAddressPools", EACH, "id"][..]].concat(),
    ) {
        inference.resolve_nearest(index, nic, pool, RelationshipKind::NetworkMembership);
    }
    for nsg in strings_at(props, &["networkSecurityGroup", "id"]) {
        inference.resolve(index, nic, nsg, RelationshipKind::NetworkMembership);
    }
}

fn subnet_network(subnet: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    if let Some(vnet) = resource_id::parent_id(&subnet.id) {
        inference.resolve(index, subnet, &vnet, RelationshipKind::NetworkMembership);
    }
    for path in [
        &["networkSecurityGroup", "id"][..],
        &["routeTable", "id"][..],
    ] {
        for target in strings_at(&subnet.properties, path) {
            inference.resolve(index, subnet, target, RelationshipKind::NetworkMembership);
        }
    }
}

fn managed_cluster_network(cluster: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    for subnet in strings_at(
        &cluster.properties,
        &["agentPoolProfiles", EACH, "vnetSubnetID"],
    ) {
        inference.resolve(index, cluster, subnet, RelationshipKind::NetworkMembership);
    }
}

fn openshift_network(cluster: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &cluster.properties;
    let master = strings_at(props, &["masterProfile", "subnetId"]);
    let workers = strings_at(props, &["workerProfiles", EACH, "subnetId"]);
    for subnet in master.into_iter().chain(workers) {
        inference.resolve(index, cluster, subnet, RelationshipKind::NetworkMembership);
    }
}

/// A zone's virtual network link ties the zone to the network it serves
fn dns_zone_link(link: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let zone = match resource_id::parent_id(&link.id) {
        Some(zone_id) => {
            let zone = index.resolve(&zone_id);
            match zone {
                Some(zone) => inference.link(link, zone, RelationshipKind::DnsLink),
                None => inference.missing(link, &zone_id, RelationshipKind::DnsLink),
            }
            zone
        }
        None => None,
    };

    for vnet_id in strings_at(&link.properties, &["virtualNetwork", "id"]) {
        match index.resolve(vnet_id) {
            Some(vnet) => {
                inference.link(link, vnet, RelationshipKind::DnsLink);
                if let Some(zone) = zone {
                    inference.link(zone, vnet, RelationshipKind::DnsLink);
                }
            }
            None => inference.missing(link, vnet_id, RelationshipKind::DnsLink),
        }
    }
}

fn private_endpoint(endpoint: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &endpoint.properties;
    for connections in [
        "privateLinkServiceConnections",
        "manualPrivateLinkServiceConnections",
    ] {
        for service in strings_at(
            props,
            &[connections, EACH, "properties", "privateLinkServiceId"],
        ) {
            inference.resolve_nearest(index, endpoint, service, RelationshipKind::PrivateLink);
        }
    }
    for subnet in strings_at(props, &["subnet", "id"]) {
        inference.resolve(index, endpoint, subnet, RelationshipKind::NetworkMembership);
    }
    for nic in strings_at(props, &["networkInterfaces", EACH, "id"]) {
        inference.resolve(index, endpoint, nic, RelationshipKind::NetworkMembership);
    }
}

fn private_link_service(service: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let props = &service.properties;
    for frontend in strings_at(props, &["loadBalancerFrontendIpConfigurations", EACH, "id"]) {
        inference.resolve_nearest(index, service, frontend, RelationshipKind::PrivateLink);
    }
    for subnet in strings_at(
        props,
        &["ipConfigurations", EACH, "properties", "subnet", "id"],
    ) {
        inference.resolve(index, service, subnet, RelationshipKind::NetworkMembership);
    }
}

/// Image version -> image definition, image definition -> gallery
fn gallery_parent(child: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    if let Some(parent) = resource_id::parent_id(&child.id) {
        inference.resolve(index, child, &parent, RelationshipKind::GalleryHierarchy);
    }
}

/// Catch-all scan of properties and identity for ids of other catalog resources
///
/// Identities and SSH keys become `identity-usage` edges from the consumer.
/// Anything else becomes a generic or cross-group reference. Ids that do not
/// resolve are ignored here since the scan has no expectation about them, and
/// ids a typed strategy already reported as missing are not retried against
/// their ancestors.
fn scan_references(subject: &Resource, index: &NodeIndex<'_>, inference: &mut Inference) {
    let mut ids = scan_resource_ids(&subject.properties);
    if let Some(identity) = &subject.identity {
        ids.extend(scan_resource_ids(identity));
    }

    for id in ids {
        if inference.was_missed(&subject.id, id) {
            continue;
        }
        let Some(target) = index.resolve_nearest(id) else {
            continue;
        };
        if target.id == subject.id {
            continue;
        }
        let kind = if target.kind().is_some_and(|kind| kind.is_identity()) {
            RelationshipKind::IdentityUsage
        } else if target
            .resource_group
            .eq_ignore_ascii_case(&subject.resource_group)
        {
            RelationshipKind::GenericReference
        } else {
            RelationshipKind::CrossGroupReference
        };
        inference.link(subject, target, kind);
    }
}
