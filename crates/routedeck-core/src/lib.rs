//! Route model and workflows between `routedeck-api` and the console.
//!
//! - **[`RouteController`]**: list (paginated), get, create, update and
//!   delete against the Admin API. Owns the list view state
//!   ([`RouteListState`]) and publishes it on a `tokio::sync::watch`
//!   channel; only the latest list request may update it.
//!
//! - **[`Route`]**: the editable route, with every list-valued field held
//!   as an array. [`convert`] maps server responses into it.
//!
//! - **[`RoutePayload`]**: the wire body built from a `Route` by the
//!   ordered shaping steps in [`form`].
//!
//! - **[`Pagination`]** and **[`DeleteWorkflow`]**: the list navigation
//!   and delete-confirmation state machines.

pub mod controller;
pub mod convert;
pub mod error;
pub mod form;
pub mod model;
pub mod pagination;
pub mod workflow;

// ── Primary re-exports ──────────────────────────────────────────────
pub use controller::{RouteController, RouteListState};
pub use error::CoreError;
pub use form::{RoutePayload, UriField, to_payload};
pub use model::{HttpMethod, ListField, Route, RouteListPage, RouteNode, RouteStatus};
pub use pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES, Pagination};
pub use workflow::DeleteWorkflow;

// Request-layer types consumers need to build a controller.
pub use routedeck_api::{ApiConfig, ErrorKind, TlsMode, TransportConfig};
