//! Azure resource kind definitions
//!
//! This module provides a centralized enum for the Azure resource types the
//! relationship engine knows how to reason about. Types outside this list are
//! still carried through the graph as plain type strings; they just get no
//! type-specific inference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of the Azure resource types with dedicated handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    // Compute
    VirtualMachine,
    VirtualMachineScaleSet,
    Disk,
    Snapshot,
    SshPublicKey,
    Gallery,
    GalleryImage,
    GalleryImageVersion,
    // Containers
    ManagedCluster,
    OpenShiftCluster,
    // Network
    NetworkInterface,
    VirtualNetwork,
    Subnet,
    NetworkSecurityGroup,
    LoadBalancer,
    PublicIpAddress,
    RouteTable,
    PrivateEndpoint,
    PrivateLinkService,
    PrivateDnsZone,
    PrivateDnsZoneLink,
    DnsZone,
    // Storage
    StorageAccount,
    // Identity
    UserAssignedIdentity,
}

/// Coarse grouping used for vertical stacking and label fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Compute,
    Network,
    Storage,
    Other,
}

/// Membership in the compute-only projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeTier {
    /// Always retained
    Core,
    /// Retained only when connected to a core resource
    Related,
}

impl ResourceKind {
    /// Get the canonical ARM type string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::VirtualMachine => "Microsoft.Compute/virtualMachines",
            ResourceKind::VirtualMachineScaleSet => "Microsoft.Compute/virtualMachineScaleSets",
            ResourceKind::Disk => "Microsoft.Compute/disks",
            ResourceKind::Snapshot => "Microsoft.Compute/snapshots",
            ResourceKind::SshPublicKey => "Microsoft.Compute/sshPublicKeys",
            ResourceKind::Gallery => "Microsoft.Compute/galleries",
            ResourceKind::GalleryImage => "Microsoft.Compute/galleries/images",
            ResourceKind::GalleryImageVersion => "Microsoft.Compute/galleries/images/versions",
            ResourceKind::ManagedCluster => "Microsoft.ContainerService/managedClusters",
            ResourceKind::OpenShiftCluster => "Microsoft.RedHatOpenShift/openShiftClusters",
            ResourceKind::NetworkInterface => "Microsoft.Network/networkInterfaces",
            ResourceKind::VirtualNetwork => "Microsoft.Network/virtualNetworks",
            ResourceKind::Subnet => "Microsoft.Network/virtualNetworks/subnets",
            ResourceKind::NetworkSecurityGroup => "Microsoft.Network/networkSecurityGroups",
            ResourceKind::LoadBalancer => "Microsoft.Network/loadBalancers",
            ResourceKind::PublicIpAddress => "Microsoft.Network/publicIPAddresses",
            ResourceKind::RouteTable => "Microsoft.Network/routeTables",
            ResourceKind::PrivateEndpoint => "Microsoft.Network/privateEndpoints",
            ResourceKind::PrivateLinkService => "Microsoft.Network/privateLinkServices",
            ResourceKind::PrivateDnsZone => "Microsoft.Network/privateDnsZones",
            ResourceKind::PrivateDnsZoneLink => {
                "Microsoft.Network/privateDnsZones/virtualNetworkLinks"
            }
            ResourceKind::DnsZone => "Microsoft.Network/dnszones",
            ResourceKind::StorageAccount => "Microsoft.Storage/storageAccounts",
            ResourceKind::UserAssignedIdentity => {
                "Microsoft.ManagedIdentity/userAssignedIdentities"
            }
        }
    }

    /// Try to parse a type string, returning None for types without dedicated handling
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Get all resource kinds
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::VirtualMachine,
            ResourceKind::VirtualMachineScaleSet,
            ResourceKind::Disk,
            ResourceKind::Snapshot,
            ResourceKind::SshPublicKey,
            ResourceKind::Gallery,
            ResourceKind::GalleryImage,
            ResourceKind::GalleryImageVersion,
            ResourceKind::ManagedCluster,
            ResourceKind::OpenShiftCluster,
            ResourceKind::NetworkInterface,
            ResourceKind::VirtualNetwork,
            ResourceKind::Subnet,
            ResourceKind::NetworkSecurityGroup,
            ResourceKind::LoadBalancer,
            ResourceKind::PublicIpAddress,
            ResourceKind::RouteTable,
            ResourceKind::PrivateEndpoint,
            ResourceKind::PrivateLinkService,
            ResourceKind::PrivateDnsZone,
            ResourceKind::PrivateDnsZoneLink,
            ResourceKind::DnsZone,
            ResourceKind::StorageAccount,
            ResourceKind::UserAssignedIdentity,
        ]
    }

    /// Kinds that the compute-only projection always keeps
    pub fn core_compute() -> impl Iterator<Item = Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|kind| kind.compute_tier() == Some(ComputeTier::Core))
    }

    pub fn compute_tier(&self) -> Option<ComputeTier> {
        match self {
            ResourceKind::VirtualMachine
            | ResourceKind::VirtualMachineScaleSet
            | ResourceKind::Disk
            | ResourceKind::Snapshot
            | ResourceKind::SshPublicKey
            | ResourceKind::Gallery
            | ResourceKind::GalleryImage
            | ResourceKind::GalleryImageVersion
            | ResourceKind::ManagedCluster
            | ResourceKind::OpenShiftCluster => Some(ComputeTier::Core),
            ResourceKind::NetworkInterface
            | ResourceKind::VirtualNetwork
            | ResourceKind::Subnet
            | ResourceKind::NetworkSecurityGroup
            | ResourceKind::LoadBalancer
            | ResourceKind::PublicIpAddress
            | ResourceKind::StorageAccount
            | ResourceKind::UserAssignedIdentity => Some(ComputeTier::Related),
            _ => None,
        }
    }

    /// True for resources that other resources authenticate with
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            ResourceKind::UserAssignedIdentity | ResourceKind::SshPublicKey
        )
    }

    /// Short display name used in node labels
    pub fn friendly_name(&self) -> &'static str {
        match self {
            ResourceKind::VirtualMachine => "Virtual Machine",
            ResourceKind::VirtualMachineScaleSet => "Scale Set",
            ResourceKind::Disk => "Managed Disk",
            ResourceKind::Snapshot => "Snapshot",
            ResourceKind::SshPublicKey => "SSH Public Key",
            ResourceKind::Gallery => "Compute Gallery",
            ResourceKind::GalleryImage => "Gallery Image",
            ResourceKind::GalleryImageVersion => "Image Version",
            ResourceKind::ManagedCluster => "AKS Cluster",
            ResourceKind::OpenShiftCluster => "OpenShift Cluster",
            ResourceKind::NetworkInterface => "Network Interface",
            ResourceKind::VirtualNetwork => "Virtual Network",
            ResourceKind::Subnet => "Subnet",
            ResourceKind::NetworkSecurityGroup => "Network Security Group",
            ResourceKind::LoadBalancer => "Load Balancer",
            ResourceKind::PublicIpAddress => "Public IP",
            ResourceKind::RouteTable => "Route Table",
            ResourceKind::PrivateEndpoint => "Private Endpoint",
            ResourceKind::PrivateLinkService => "Private Link Service",
            ResourceKind::PrivateDnsZone => "Private DNS Zone",
            ResourceKind::PrivateDnsZoneLink => "VNet Link",
            ResourceKind::DnsZone => "DNS Zone",
            ResourceKind::StorageAccount => "Storage Account",
            ResourceKind::UserAssignedIdentity => "Managed Identity",
        }
    }

    /// One-line role description shown at the detailed label level
    pub fn role(&self) -> Option<&'static str> {
        match self {
            ResourceKind::SshPublicKey => Some("Authentication Credential"),
            ResourceKind::Gallery => Some("Image Repository"),
            ResourceKind::GalleryImage => Some("Image Definition"),
            ResourceKind::GalleryImageVersion => Some("Versioned Image"),
            ResourceKind::UserAssignedIdentity => Some("Authentication Service"),
            ResourceKind::PrivateDnsZone => Some("Internal DNS Resolution"),
            ResourceKind::PrivateDnsZoneLink => Some("DNS-VNet Connection"),
            _ => None,
        }
    }
}

/// Category of an arbitrary type string, falling back to the provider namespace
pub fn category_of(resource_type: &str) -> ResourceCategory {
    let provider = resource_type
        .split('/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match provider.as_str() {
        "microsoft.compute" | "microsoft.containerservice" | "microsoft.redhatopenshift"
        | "microsoft.web" | "microsoft.batch" => ResourceCategory::Compute,
        "microsoft.network" => ResourceCategory::Network,
        "microsoft.storage" => ResourceCategory::Storage,
        _ => ResourceCategory::Other,
    }
}

/// Provider display category, e.g. "Compute" for `Microsoft.Compute/disks`
pub fn provider_label(resource_type: &str) -> String {
    let provider = resource_type.split('/').next().unwrap_or_default();
    if provider.is_empty() {
        return "Unknown".to_string();
    }
    let short = provider
        .strip_prefix("Microsoft.")
        .or_else(|| provider.strip_prefix("microsoft."))
        .unwrap_or(provider);
    let mut chars = short.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_lowercase(),
        None => "Unknown".to_string(),
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceCategory::Compute => "compute",
            ResourceCategory::Network => "network",
            ResourceCategory::Storage => "storage",
            ResourceCategory::Other => "other",
        };
        write!(f, "{}", name)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    /// ARM type strings are case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown resource type: {}", s))
    }
}

impl ResourceKind {
    /// Category used for vertical stacking
    pub fn category(&self) -> ResourceCategory {
        category_of(self.as_str())
    }
}
