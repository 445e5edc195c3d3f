//! Node label text

use crate::models::resource_kind::provider_label;
use crate::models::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much text goes into a node label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelVerbosity {
    /// Name only
    Minimal,
    /// Name and type
    #[default]
    Standard,
    /// Name, type and role
    Detailed,
}

impl LabelVerbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelVerbosity::Minimal => "minimal",
            LabelVerbosity::Standard => "standard",
            LabelVerbosity::Detailed => "detailed",
        }
    }
}

impl fmt::Display for LabelVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LabelVerbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(LabelVerbosity::Minimal),
            "standard" => Ok(LabelVerbosity::Standard),
            "detailed" => Ok(LabelVerbosity::Detailed),
            other => Err(format!("Unknown label verbosity: {}", other)),
        }
    }
}

/// Name shown for a resource; nested gallery and DNS link names keep their last segment
pub fn display_name(resource: &Resource) -> String {
    let short = match resource.kind() {
        Some(
            ResourceKind::GalleryImage
            | ResourceKind::GalleryImageVersion
            | ResourceKind::PrivateDnsZoneLink,
        ) => resource.name.rsplit('/').next().unwrap_or(&resource.name),
        _ => resource.name.as_str(),
    };
    short.to_string()
}

/// Type line: a friendly name for known kinds, the provider for everything else
pub fn type_caption(resource: &Resource) -> String {
    match resource.kind() {
        Some(kind) => kind.friendly_name().to_string(),
        None => provider_label(&resource.resource_type),
    }
}

/// Label lines joined with `\n`
pub fn node_label(resource: &Resource, verbosity: LabelVerbosity) -> String {
    let name = display_name(resource);
    if verbosity == LabelVerbosity::Minimal {
        return name;
    }

    let name = if resource.is_kind(ResourceKind::GalleryImageVersion) {
        format!("v{}", name)
    } else {
        name
    };
    let mut lines = vec![name, format!("({})", type_caption(resource))];

    if verbosity == LabelVerbosity::Detailed {
        if let Some(role) = resource.kind().and_then(|kind| kind.role()) {
            lines.push(role.to_string());
        }
    }
    lines.join("\n")
}
