// ── Payload shaping (forward mapping) ──
//
// `&Route -> RoutePayload`, built from small steps applied in a fixed
// order: URIs, hosts/remote addresses, methods, optional strings, then
// the always-sent scalars. The Admin API treats a missing field as "no
// constraint", so anything empty is omitted rather than sent blank.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{Route, RouteStatus};

/// Body of `POST /routes` and `PUT /routes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addrs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    pub priority: i64,
    pub status: RouteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_config_id: Option<String>,
    pub enable_websocket: bool,
    /// Unedited server fields, passed through as fetched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire keys the payload writes itself. A pass-through entry never
/// shadows one of them.
const OWNED_KEYS: &[&str] = &[
    "id",
    "name",
    "desc",
    "uri",
    "uris",
    "host",
    "hosts",
    "remote_addr",
    "remote_addrs",
    "methods",
    "priority",
    "status",
    "upstream_id",
    "service_id",
    "plugin_config_id",
    "enable_websocket",
    "create_time",
    "update_time",
];

/// How the `uris` list lands on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriField {
    Omitted,
    Single(String),
    Many(Vec<String>),
}

// ── Steps ──────────────────────────────────────────────────────────

/// Step 1. A lone `""` is dropped and a lone non-empty entry becomes the
/// scalar `uri`. Longer lists lose their blank entries.
pub fn shape_uris(uris: &[String]) -> UriField {
    match uris {
        [] => UriField::Omitted,
        [only] if only.is_empty() => UriField::Omitted,
        [only] => UriField::Single(only.clone()),
        many => non_blank(many).map_or(UriField::Omitted, UriField::Many),
    }
}

/// Step 2. Blank entries removed; `None` if nothing is left.
pub fn non_blank(entries: &[String]) -> Option<Vec<String>> {
    let kept: Vec<String> = entries
        .iter()
        .filter(|e| !e.trim().is_empty())
        .cloned()
        .collect();
    (!kept.is_empty()).then_some(kept)
}

/// Step 3. An empty selection means "any method" and is omitted.
pub fn shape_methods(methods: &[String]) -> Option<Vec<String>> {
    (!methods.is_empty()).then(|| methods.to_vec())
}

/// Step 4.
pub fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

// ── Mapping ────────────────────────────────────────────────────────

impl From<&Route> for RoutePayload {
    fn from(route: &Route) -> Self {
        let (uri, uris) = match shape_uris(&route.uris) {
            UriField::Omitted => (None, None),
            UriField::Single(uri) => (Some(uri), None),
            UriField::Many(uris) => (None, Some(uris)),
        };

        Self {
            uri,
            uris,
            hosts: non_blank(&route.hosts),
            remote_addrs: non_blank(&route.remote_addrs),
            methods: shape_methods(&route.methods),
            name: non_empty(route.name.as_ref()),
            desc: non_empty(route.desc.as_ref()),
            upstream_id: non_empty(route.upstream_id.as_ref()),
            service_id: non_empty(route.service_id.as_ref()),
            plugin_config_id: non_empty(route.plugin_config_id.as_ref()),
            // Step 5.
            id: non_empty(route.id.as_ref()),
            priority: route.priority,
            status: route.status,
            enable_websocket: route.enable_websocket,
            extra: route
                .extra
                .iter()
                .filter(|(k, _)| !OWNED_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

pub fn to_payload(route: &Route) -> RoutePayload {
    RoutePayload::from(route)
}

impl RoutePayload {
    /// A route must carry at least one URI constraint.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.uri.is_none() && self.uris.is_none() {
            return Err(CoreError::ValidationFailed {
                message: "a route needs at least one non-empty URI".into(),
            });
        }
        Ok(())
    }
}
