//! Command handlers: bridge CLI args to `RouteController` calls and
//! output formatting.

pub mod config_cmd;
pub mod routes;
pub mod util;
