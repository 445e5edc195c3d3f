//! ARM resource id helpers
//!
//! Resource ids have the shape
//! `/subscriptions/{sub}/resourceGroups/{group}/providers/{Namespace}/{type}/{name}[/{childType}/{childName}]...`
//! and are compared case-insensitively by Azure.

const SUBSCRIPTIONS_PREFIX: &str = "/subscriptions/";

/// Quick check used when scanning arbitrary property strings
pub fn looks_like_resource_id(s: &str) -> bool {
    s.len() > SUBSCRIPTIONS_PREFIX.len()
        && s
            .get(..SUBSCRIPTIONS_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SUBSCRIPTIONS_PREFIX))
}

/// Key used for case-insensitive id lookups
pub fn normalize(id: &str) -> String {
    id.trim().trim_end_matches('/').to_ascii_lowercase()
}

fn segments(id: &str) -> Vec<&str> {
    id.trim().trim_matches('/').split('/').collect()
}

fn segment_after<'a>(segments: &[&'a str], key: &str) -> Option<&'a str> {
    segments
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case(key))
        .and_then(|idx| segments.get(idx + 1))
        .copied()
        .filter(|value| !value.is_empty())
}

/// Subscription id embedded in a resource id
pub fn subscription_of(id: &str) -> Option<&str> {
    segment_after(&segments(id), "subscriptions")
}

/// Resource group name embedded in a resource id
pub fn resource_group_of(id: &str) -> Option<&str> {
    segment_after(&segments(id), "resourceGroups")
}

/// Last path segment, which is the resource name for well-formed ids
pub fn last_segment(id: &str) -> &str {
    id.trim().trim_end_matches('/').rsplit('/').next().unwrap_or(id)
}

/// Id of the enclosing resource for child ids
///
/// `/…/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/default` yields
/// `/…/providers/Microsoft.Network/virtualNetworks/vnet1`. Top-level resources
/// (and anything not shaped like an ARM id) have no parent.
pub fn parent_id(id: &str) -> Option<String> {
    let segs = segments(id);
    let providers = segs
        .iter()
        .rposition(|segment| segment.eq_ignore_ascii_case("providers"))?;
    // namespace + at least two type/name pairs
    let after = segs.len() - (providers + 1);
    if after < 5 || after % 2 == 0 {
        return None;
    }
    Some(format!("/{}", segs[..segs.len() - 2].join("/")))
}

/// Name of a child resource relative to the top-level resource,
/// e.g. `gallery1/image1/1.0.0` for an image version
pub fn nested_name(id: &str) -> Option<String> {
    let segs = segments(id);
    let providers = segs
        .iter()
        .rposition(|segment| segment.eq_ignore_ascii_case("providers"))?;
    let names: Vec<&str> = segs[providers + 1..]
        .iter()
        .skip(1)
        .skip(1)
        .step_by(2)
        .copied()
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join("/"))
    }
}
