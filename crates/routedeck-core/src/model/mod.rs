// ── Domain model ──

pub mod route;

pub use route::{HttpMethod, ListField, Route, RouteListPage, RouteNode, RouteStatus};
