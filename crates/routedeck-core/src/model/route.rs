// ── Route domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::pagination;

/// Whether the gateway serves a route. Encoded as `0`/`1` on the wire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RouteStatus {
    Disabled,
    #[default]
    Enabled,
}

impl RouteStatus {
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<RouteStatus> for u8 {
    fn from(status: RouteStatus) -> Self {
        match status {
            RouteStatus::Disabled => 0,
            RouteStatus::Enabled => 1,
        }
    }
}

impl TryFrom<u8> for RouteStatus {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(raw))
    }
}

impl TryFrom<i64> for RouteStatus {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Enabled),
            other => Err(format!("route status must be 0 or 1, got {other}")),
        }
    }
}

/// Method tokens the console offers for route matching.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
    Purge,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The array fields of a route that the form edits entry by entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Uris,
    Hosts,
    RemoteAddrs,
}

/// Editable route.
///
/// Every list-valued field is an array here, whatever shape the server
/// used. An empty `methods` list matches any HTTP method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub uris: Vec<String>,
    pub hosts: Vec<String>,
    pub remote_addrs: Vec<String>,
    pub methods: Vec<String>,
    pub priority: i64,
    pub status: RouteStatus,
    pub upstream_id: Option<String>,
    pub service_id: Option<String>,
    pub plugin_config_id: Option<String>,
    pub enable_websocket: bool,
    /// Server-assigned; never sent back.
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    /// Server fields the console does not edit (plugins, vars, inline
    /// upstream). Sent back untouched on update.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Route {
    /// The create-form starting point: one catch-all URI, enabled, priority 0.
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            desc: None,
            uris: vec!["/".into()],
            hosts: Vec::new(),
            remote_addrs: Vec::new(),
            methods: Vec::new(),
            priority: 0,
            status: RouteStatus::Enabled,
            upstream_id: None,
            service_id: None,
            plugin_config_id: None,
            enable_websocket: false,
            create_time: None,
            update_time: None,
            extra: Map::new(),
        }
    }
}

impl Route {
    /// Short label for listings: the name, else the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.id.as_deref())
            .unwrap_or("-")
    }

    /// Where matched traffic goes, for listings.
    pub fn target(&self) -> Option<String> {
        if let Some(id) = &self.upstream_id {
            Some(format!("upstream:{id}"))
        } else if let Some(id) = &self.service_id {
            Some(format!("service:{id}"))
        } else {
            self.plugin_config_id
                .as_ref()
                .map(|id| format!("plugin_config:{id}"))
        }
    }

    // ── Form editing helpers ─────────────────────────────────────────

    pub fn field(&self, field: ListField) -> &[String] {
        match field {
            ListField::Uris => &self.uris,
            ListField::Hosts => &self.hosts,
            ListField::RemoteAddrs => &self.remote_addrs,
        }
    }

    fn field_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Uris => &mut self.uris,
            ListField::Hosts => &mut self.hosts,
            ListField::RemoteAddrs => &mut self.remote_addrs,
        }
    }

    /// Append an empty entry to `field`.
    pub fn push_entry(&mut self, field: ListField) {
        self.field_mut(field).push(String::new());
    }

    /// Replace entry `index`. Returns `false` when the index is out of range.
    pub fn set_entry(&mut self, field: ListField, index: usize, value: impl Into<String>) -> bool {
        match self.field_mut(field).get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Remove and return entry `index`, if present.
    pub fn remove_entry(&mut self, field: ListField, index: usize) -> Option<String> {
        let entries = self.field_mut(field);
        (index < entries.len()).then(|| entries.remove(index))
    }

    /// Turn a method on or off. Returns whether it is now selected.
    pub fn toggle_method(&mut self, method: &str) -> bool {
        if let Some(pos) = self
            .methods
            .iter()
            .position(|m| m.eq_ignore_ascii_case(method))
        {
            self.methods.remove(pos);
            false
        } else {
            self.methods.push(method.to_ascii_uppercase());
            true
        }
    }
}

/// One entry of a route listing: storage key plus route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    pub key: String,
    pub value: Route,
}

/// One fetched page of routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteListPage {
    pub items: Vec<RouteNode>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl RouteListPage {
    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.total, self.page_size)
    }
}
