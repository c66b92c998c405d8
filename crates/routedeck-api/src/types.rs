// Wire types for the Admin API route endpoints.
//
// These mirror what the server actually returns, which is loose: list
// fields may arrive as a bare string or an array, ids may be numbers,
// and every field except the node envelope is optional.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A field the server returns either as a single string or as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

/// Route object as stored by the gateway.
///
/// Fields outside the console's editable set (plugins, vars, scripts,
/// inline upstreams, …) are kept in `extra` so a PUT can send them back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteValue {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub uri: Option<String>,
    pub uris: Option<OneOrMany>,
    pub host: Option<String>,
    pub hosts: Option<OneOrMany>,
    pub remote_addr: Option<String>,
    pub remote_addrs: Option<OneOrMany>,
    pub methods: Option<OneOrMany>,
    pub priority: Option<i64>,
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub upstream_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub plugin_config_id: Option<String>,
    pub enable_websocket: Option<bool>,
    pub create_time: Option<i64>,
    pub update_time: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One entry of a list response: storage key plus the route itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNodeValue {
    #[serde(default)]
    pub key: String,
    pub value: RouteValue,
}

/// Accepted shapes of `GET /routes`.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteListResponse {
    /// `{ total, list: [...] }`. `total` falls back to the list length.
    Page {
        total: u64,
        list: Vec<RouteNodeValue>,
    },
    /// `{ error_msg }` returned with a success status.
    Rejected { error_msg: String },
}

pub(crate) const UNEXPECTED_FORMAT: &str =
    "Received an unexpected response format from the server.";

impl RouteListResponse {
    /// Classify a list body. Anything that is neither a page nor an
    /// `error_msg` envelope is [`Error::UnexpectedResponse`].
    pub fn from_body(body: Option<Value>) -> Result<Self, Error> {
        let Some(mut body) = body else {
            return Err(unexpected(UNEXPECTED_FORMAT));
        };

        if let Some(list) = body.get_mut("list").filter(|l| l.is_array()).map(Value::take) {
            let list: Vec<RouteNodeValue> = serde_json::from_value(list)
                .map_err(|e| unexpected(&format!("invalid route list entry: {e}")))?;
            let total = body
                .get("total")
                .and_then(Value::as_u64)
                .filter(|t| *t > 0)
                .unwrap_or_else(|| u64::try_from(list.len()).unwrap_or(u64::MAX));
            return Ok(Self::Page { total, list });
        }

        if let Some(msg) = body.get("error_msg").and_then(Value::as_str) {
            return Ok(Self::Rejected {
                error_msg: msg.to_owned(),
            });
        }

        Err(unexpected(UNEXPECTED_FORMAT))
    }
}

/// Extract the route from a `{ value: Route }` envelope.
pub fn route_from_envelope(body: Option<Value>) -> Result<RouteValue, Error> {
    let value = body
        .and_then(|mut b| b.get_mut("value").map(Value::take))
        .filter(Value::is_object)
        .ok_or_else(|| unexpected("expected a `value` object in the route response"))?;
    serde_json::from_value(value).map_err(|e| unexpected(&format!("invalid route: {e}")))
}

/// Extract a route from a create/update response, which is either a
/// `{ key, value }` node or the bare route. Empty bodies yield `None`.
pub fn route_from_mutation(body: Option<Value>) -> Result<Option<RouteValue>, Error> {
    let Some(mut body) = body else {
        return Ok(None);
    };
    if !body.is_object() {
        return Err(unexpected("expected a route object in the response"));
    }
    let route = if body.get("value").is_some_and(Value::is_object) {
        body["value"].take()
    } else {
        body
    };
    serde_json::from_value(route)
        .map(Some)
        .map_err(|e| unexpected(&format!("invalid route: {e}")))
}

fn unexpected(message: &str) -> Error {
    Error::UnexpectedResponse {
        message: message.to_owned(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}
