// ── Route controller ──
//
// Orchestrates list/get/create/update/delete against the Admin API and
// owns the list view state: pagination, current page, last error and the
// delete-confirmation workflow. State is published on a watch channel.
//
// Only the most recently issued list request may update the state; every
// fetch takes a sequence number and results from older ones are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use routedeck_api::types::RouteListResponse;
use routedeck_api::{ApiClient, ApiConfig, TransportConfig};

use crate::error::CoreError;
use crate::form::RoutePayload;
use crate::model::{Route, RouteListPage, RouteNode};
use crate::pagination::Pagination;
use crate::workflow::DeleteWorkflow;

// ── RouteListState ───────────────────────────────────────────────

/// Snapshot of the route list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteListState {
    pub pagination: Pagination,
    pub items: Vec<RouteNode>,
    /// Message of the last failed list fetch, cleared on success.
    pub error: Option<String>,
    /// Advisory: a list fetch is in flight.
    pub loading: bool,
    pub delete: DeleteWorkflow,
}

// ── RouteController ──────────────────────────────────────────────

/// Cheaply cloneable via `Arc<RouteControllerInner>`.
#[derive(Clone)]
pub struct RouteController {
    inner: Arc<RouteControllerInner>,
}

struct RouteControllerInner {
    client: ApiClient,
    list_seq: AtomicU64,
    state: watch::Sender<RouteListState>,
}

impl RouteController {
    /// Build a controller and its HTTP client from an injected config.
    ///
    /// An absent config is accepted here; every operation then fails with
    /// [`CoreError::ConfigurationMissing`] without touching the network.
    pub fn new(config: Option<ApiConfig>, transport: &TransportConfig) -> Result<Self, CoreError> {
        Ok(Self::with_client(ApiClient::new(config, transport)?))
    }

    pub fn with_client(client: ApiClient) -> Self {
        let (state, _) = watch::channel(RouteListState::default());
        Self {
            inner: Arc::new(RouteControllerInner {
                client,
                list_seq: AtomicU64::new(0),
                state,
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    /// Current state snapshot.
    pub fn state(&self) -> RouteListState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RouteListState> {
        self.inner.state.subscribe()
    }

    // ── Listing ──────────────────────────────────────────────────

    /// Fetch one page. Page 0 is treated as 1.
    ///
    /// A `{ error_msg }` answer empties the page, records the message and
    /// returns [`CoreError::Rejected`]. Any other failure records the
    /// message and leaves the current items in place.
    pub async fn list(&self, page: u32, page_size: u32) -> Result<RouteListPage, CoreError> {
        let mut pagination = Pagination::new(page, page_size);
        let seq = self.inner.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|s| s.loading = true);

        debug!(
            seq,
            page = pagination.page(),
            page_size = pagination.page_size(),
            "listing routes"
        );
        let response = self
            .inner
            .client
            .list_routes(pagination.page(), pagination.page_size())
            .await;

        if self.inner.list_seq.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding stale route list response");
            return Err(CoreError::Superseded);
        }

        let outcome = match response {
            Ok(RouteListResponse::Page { total, list }) => {
                // One bad entry must not hide the rest of the page.
                let items = list
                    .into_iter()
                    .filter_map(|node| {
                        let key = node.key.clone();
                        RouteNode::try_from(node)
                            .inspect_err(|e| warn!(%key, error = %e, "skipping malformed route"))
                            .ok()
                    })
                    .collect::<Vec<_>>();
                Ok((total, items))
            }
            Ok(RouteListResponse::Rejected { error_msg }) => {
                warn!(error = %error_msg, "route list rejected");
                self.inner.state.send_modify(|s| {
                    s.pagination = pagination;
                    s.items.clear();
                    s.error = Some(error_msg.clone());
                    s.loading = false;
                });
                return Err(CoreError::Rejected { message: error_msg });
            }
            Err(e) => Err(CoreError::from(e)),
        };

        match outcome {
            Ok((total, items)) => {
                pagination.set_total(total);
                let page = RouteListPage {
                    items: items.clone(),
                    total,
                    page: pagination.page(),
                    page_size: pagination.page_size(),
                };
                self.inner.state.send_modify(|s| {
                    s.pagination = pagination;
                    s.items = items;
                    s.error = None;
                    s.loading = false;
                });
                Ok(page)
            }
            Err(err) => {
                self.inner.state.send_modify(|s| {
                    s.error = Some(err.to_string());
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    /// Re-fetch the current page.
    pub async fn refresh(&self) -> Result<RouteListPage, CoreError> {
        let p = self.state().pagination;
        self.list(p.page(), p.page_size()).await
    }

    /// Jump to `page`, clamped against the last known total.
    pub async fn go_to_page(&self, page: u32) -> Result<RouteListPage, CoreError> {
        let mut p = self.state().pagination;
        p.go_to(page);
        self.list(p.page(), p.page_size()).await
    }

    pub async fn next_page(&self) -> Result<RouteListPage, CoreError> {
        let mut p = self.state().pagination;
        p.next();
        self.list(p.page(), p.page_size()).await
    }

    pub async fn previous_page(&self) -> Result<RouteListPage, CoreError> {
        let mut p = self.state().pagination;
        p.previous();
        self.list(p.page(), p.page_size()).await
    }

    /// Change the page size and go back to page 1.
    pub async fn set_page_size(&self, page_size: u32) -> Result<RouteListPage, CoreError> {
        let mut p = self.state().pagination;
        p.set_page_size(page_size);
        self.list(p.page(), p.page_size()).await
    }

    // ── Single-route operations ──────────────────────────────────

    pub async fn get(&self, id: &str) -> Result<Route, CoreError> {
        let value = self.inner.client.get_route(id).await?;
        Route::try_from(value)
    }

    /// Save a route: `PUT /routes/{id}` when it carries an id, otherwise
    /// `POST /routes` and the server assigns one.
    pub async fn create(&self, route: &Route) -> Result<Option<Route>, CoreError> {
        let payload = RoutePayload::from(route);
        payload.validate()?;

        let saved = match payload.id.as_deref() {
            Some(id) => self.inner.client.put_route(id, &payload).await?,
            None => self.inner.client.post_route(&payload).await?,
        };
        let saved = saved.map(Route::try_from).transpose()?;
        info!(
            id = saved.as_ref().and_then(|r| r.id.as_deref()).unwrap_or("-"),
            "route created"
        );
        Ok(saved)
    }

    pub async fn update(&self, id: &str, route: &Route) -> Result<Option<Route>, CoreError> {
        let payload = RoutePayload::from(route);
        payload.validate()?;

        let saved = self.inner.client.put_route(id, &payload).await?;
        info!(id, "route updated");
        saved.map(Route::try_from).transpose()
    }

    /// Delete without confirmation, then re-list the current page.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.inner.client.delete_route(id).await?;
        info!(id, "route deleted");
        self.reload_after_delete().await;
        Ok(())
    }

    // ── Delete workflow ──────────────────────────────────────────

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&self, id: &str) -> Result<(), CoreError> {
        self.update_delete(|wf| wf.request(id))
    }

    pub fn cancel_delete(&self) -> Result<(), CoreError> {
        self.update_delete(DeleteWorkflow::cancel)
    }

    /// Delete the pending target. On failure the dialog stays open with
    /// the error and the error is returned.
    pub async fn confirm_delete(&self) -> Result<(), CoreError> {
        let target = self.update_delete(DeleteWorkflow::confirm)?;

        match self.inner.client.delete_route(&target).await {
            Ok(()) => {
                self.inner.state.send_modify(|s| s.delete.succeed());
                info!(id = %target, "route deleted");
                self.reload_after_delete().await;
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                let message = err.to_string();
                self.inner.state.send_modify(|s| s.delete.fail(message));
                Err(err)
            }
        }
    }

    fn update_delete<T>(
        &self,
        f: impl FnOnce(&mut DeleteWorkflow) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut result = Err(CoreError::NoDeletePending);
        self.inner.state.send_if_modified(|s| {
            result = f(&mut s.delete);
            result.is_ok()
        });
        result
    }

    /// Re-list after a delete. A page that emptied out past the end moves
    /// back to the new last page. Failures only land in the state.
    async fn reload_after_delete(&self) {
        match self.refresh().await {
            Ok(page) if page.page > page.total_pages() => {
                if let Err(e) = self.go_to_page(page.total_pages()).await {
                    warn!(error = %e, "failed to reload routes after delete");
                }
            }
            Ok(_) | Err(CoreError::Superseded) => {}
            Err(e) => warn!(error = %e, "failed to reload routes after delete"),
        }
    }
}
