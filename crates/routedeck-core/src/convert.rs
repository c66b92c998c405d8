// ── Wire-to-domain conversion (reverse mapping) ──
//
// Bridges the loose `routedeck_api::types` shapes into the always-array
// `Route` edit model. List fields accept an array, a bare scalar or
// nothing; the singular `uri`/`host`/`remote_addr` fields are folded in
// when the plural is absent. Blank entries and empty strings are dropped
// so that a converted route feeds straight back into payload shaping.

use chrono::{DateTime, Utc};
use serde_json::Value;

use routedeck_api::types::{OneOrMany, RouteNodeValue, RouteValue};

use crate::error::CoreError;
use crate::model::{Route, RouteNode, RouteStatus};

// ── Helpers ────────────────────────────────────────────────────────

/// Convert an optional epoch-seconds timestamp to `DateTime<Utc>`.
fn epoch_to_datetime(epoch: Option<i64>) -> Option<DateTime<Utc>> {
    epoch.and_then(|ts| DateTime::from_timestamp(ts, 0))
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

/// Plural field if present, else the singular one, else nothing.
fn list_field(plural: Option<OneOrMany>, singular: Option<String>) -> Vec<String> {
    plural
        .map(OneOrMany::into_vec)
        .or_else(|| singular.map(|s| vec![s]))
        .unwrap_or_default()
        .into_iter()
        .filter(|entry| !entry.trim().is_empty())
        .collect()
}

// ── Conversions ────────────────────────────────────────────────────

impl TryFrom<RouteValue> for Route {
    type Error = CoreError;

    fn try_from(v: RouteValue) -> Result<Self, Self::Error> {
        let status = match v.status {
            None => RouteStatus::Enabled,
            Some(raw) => RouteStatus::try_from(raw)
                .map_err(|message| CoreError::UnexpectedResponse { message })?,
        };

        Ok(Self {
            id: non_empty(v.id),
            name: non_empty(v.name),
            desc: non_empty(v.desc),
            uris: list_field(v.uris, v.uri),
            hosts: list_field(v.hosts, v.host),
            remote_addrs: list_field(v.remote_addrs, v.remote_addr),
            methods: v.methods.map(OneOrMany::into_vec).unwrap_or_default(),
            priority: v.priority.unwrap_or(0),
            status,
            upstream_id: non_empty(v.upstream_id),
            service_id: non_empty(v.service_id),
            plugin_config_id: non_empty(v.plugin_config_id),
            enable_websocket: v.enable_websocket.unwrap_or(false),
            create_time: epoch_to_datetime(v.create_time),
            update_time: epoch_to_datetime(v.update_time),
            extra: v.extra,
        })
    }
}

impl TryFrom<RouteNodeValue> for RouteNode {
    type Error = CoreError;

    fn try_from(node: RouteNodeValue) -> Result<Self, Self::Error> {
        Ok(Self {
            key: node.key,
            value: Route::try_from(node.value)?,
        })
    }
}

/// Parse operator-supplied JSON: a bare route or a `{ key, value }` node,
/// in the server's wire shape.
pub fn route_from_json(json: Value) -> Result<Route, CoreError> {
    let inner = match json {
        Value::Object(mut map) if map.get("value").is_some_and(Value::is_object) => {
            map.remove("value").unwrap_or_default()
        }
        other => other,
    };
    let wire: RouteValue =
        serde_json::from_value(inner).map_err(|e| CoreError::ValidationFailed {
            message: format!("not a route object: {e}"),
        })?;
    Route::try_from(wire).map_err(|e| CoreError::ValidationFailed {
        message: e.to_string(),
    })
}
