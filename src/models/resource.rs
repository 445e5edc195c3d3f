//! Resource records
//!
//! `RawResource` mirrors one entry of an `az resource list` style snapshot.
//! `Resource` is the normalized, immutable form stored in the catalog.

use super::resource_kind::{ResourceCategory, ResourceKind, category_of};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A resource record as delivered by a resource provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Values are kept as delivered; ARM snapshots occasionally carry null
    /// or non-string tag values
    #[serde(default)]
    pub tags: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(default)]
    pub identity: Option<Value>,
}

/// VM power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Running,
    Stopped,
    Transitional,
    Unknown,
}

impl PowerState {
    /// Parse a power state code such as `PowerState/deallocated`, `VM running` or `running`
    pub fn from_code(code: &str) -> Self {
        let state = code
            .rsplit(['/', ' '])
            .find(|word| !word.is_empty())
            .unwrap_or(code);
        match state.to_ascii_lowercase().as_str() {
            "running" => PowerState::Running,
            "stopped" | "deallocated" => PowerState::Stopped,
            "starting" | "stopping" | "deallocating" => PowerState::Transitional,
            _ => PowerState::Unknown,
        }
    }

    /// Power state reported inside an instance view, if any
    pub fn from_properties(properties: &Value) -> Option<Self> {
        if let Some(code) = properties
            .pointer("/extended/instanceView/powerState/code")
            .and_then(|c| c.as_str())
        {
            return Some(Self::from_code(code));
        }

        properties
            .pointer("/instanceView/statuses")
            .and_then(|s| s.as_array())
            .and_then(|statuses| {
                statuses
                    .iter()
                    .filter_map(|status| status.get("code").and_then(|c| c.as_str()))
                    .find(|code| code.starts_with("PowerState/"))
            })
            .map(Self::from_code)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerState::Running => "running",
            PowerState::Stopped => "stopped",
            PowerState::Transitional => "transitional",
            PowerState::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// A normalized resource. Immutable once ingested into a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub resource_group: String,
    pub subscription_id: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub properties: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Value>,
}

impl Resource {
    /// Minimal resource with empty properties, convenient for building graphs by hand
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_type: impl Into<String>,
        resource_group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type: resource_type.into(),
            resource_group: resource_group.into(),
            subscription_id: String::new(),
            location: String::new(),
            tags: BTreeMap::new(),
            power_state: None,
            properties: Value::Null,
            identity: None,
        }
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::parse_optional(&self.resource_type)
    }

    pub fn is_kind(&self, kind: ResourceKind) -> bool {
        self.resource_type.eq_ignore_ascii_case(kind.as_str())
    }

    pub fn category(&self) -> ResourceCategory {
        category_of(&self.resource_type)
    }

    /// Scalar top-level properties, the ones a renderer can print on a label
    pub fn label_properties(&self) -> BTreeMap<String, String> {
        let Some(map) = self.properties.as_object() else {
            return BTreeMap::new();
        };
        map.iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}
