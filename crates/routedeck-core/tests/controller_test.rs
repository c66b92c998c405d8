#![allow(clippy::unwrap_used)]
// Integration tests for `RouteController` against a wiremock Admin API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routedeck_api::ApiClient;
use routedeck_core::{
    ApiConfig, CoreError, DeleteWorkflow, Route, RouteController, RouteStatus, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RouteController) {
    let server = MockServer::start().await;
    let config = ApiConfig::new(server.uri(), "test-key");
    let controller =
        RouteController::with_client(ApiClient::with_client(Some(config), reqwest::Client::new()));
    (server, controller)
}

fn page_body(total: u64, ids: &[&str]) -> serde_json::Value {
    let list: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "key": format!("/apisix/routes/{id}"),
                "value": { "id": id, "uri": format!("/{id}"), "upstream_id": "1" }
            })
        })
        .collect();
    json!({ "total": total, "list": list })
}

async fn mount_page(server: &MockServer, page: u32, size: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/routes"))
        .and(query_param("page", page.to_string()))
        .and(query_param("page_size", size.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_updates_state() {
    let (server, controller) = setup().await;
    mount_page(&server, 1, 10, page_body(95, &["1", "2"])).await;

    let page = assert_ok!(controller.list(1, 10).await);
    assert_eq!(page.total, 95);
    assert_eq!(page.total_pages(), 10);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].value.uris, ["/1"]);

    let state = controller.state();
    assert_eq!(state.pagination.total(), 95);
    assert_eq!(state.pagination.total_pages(), 10);
    assert_eq!(state.items, page.items);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_malformed_item_is_skipped() {
    let (server, controller) = setup().await;
    mount_page(
        &server,
        1,
        10,
        json!({
            "total": 2,
            "list": [
                { "key": "/apisix/routes/bad", "value": { "id": "bad", "uri": "/bad", "status": 7 } },
                { "key": "/apisix/routes/ok", "value": { "id": "ok", "uri": "/ok" } }
            ]
        }),
    )
    .await;

    let page = assert_ok!(controller.list(1, 10).await);
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].value.id.as_deref(), Some("ok"));

    let state = controller.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_navigation_clamps_to_known_total() {
    let (server, controller) = setup().await;
    mount_page(&server, 1, 10, page_body(95, &["1"])).await;
    mount_page(&server, 10, 10, page_body(95, &["91"])).await;

    assert_ok!(controller.list(1, 10).await);

    let last = assert_ok!(controller.go_to_page(11).await);
    assert_eq!(last.page, 10);

    let still_last = assert_ok!(controller.next_page().await);
    assert_eq!(still_last.page, 10);

    let first = assert_ok!(controller.go_to_page(0).await);
    assert_eq!(first.page, 1);
}

#[tokio::test]
async fn test_page_size_change_returns_to_first_page() {
    let (server, controller) = setup().await;
    mount_page(&server, 3, 10, page_body(95, &["21"])).await;
    mount_page(&server, 1, 50, page_body(95, &["1"])).await;

    assert_ok!(controller.list(3, 10).await);
    let page = assert_ok!(controller.set_page_size(50).await);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 50);
    assert_eq!(controller.state().pagination.total_pages(), 2);
}

#[tokio::test]
async fn test_total_falls_back_to_list_length() {
    let (server, controller) = setup().await;
    mount_page(
        &server,
        1,
        10,
        json!({ "list": [{ "key": "k", "value": { "uri": "/" } }] }),
    )
    .await;

    let page = assert_ok!(controller.list(1, 10).await);
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_error_msg_empties_page() {
    let (server, controller) = setup().await;
    mount_page(&server, 1, 10, json!({ "error_msg": "failed to fetch data from etcd" })).await;

    let err = assert_err!(controller.list(1, 10).await);
    assert!(matches!(err, CoreError::Rejected { .. }), "got: {err:?}");

    let state = controller.state();
    assert!(state.items.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("failed to fetch data from etcd")
    );
}

#[tokio::test]
async fn test_unexpected_shape_keeps_items() {
    let (server, controller) = setup().await;
    mount_page(&server, 1, 10, page_body(1, &["1"])).await;
    mount_page(&server, 2, 10, json!({ "routes": [] })).await;

    assert_ok!(controller.list(1, 10).await);
    let err = assert_err!(controller.list(2, 10).await);
    assert!(matches!(err, CoreError::UnexpectedResponse { .. }));

    let state = controller.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(
        state.error.as_deref(),
        Some("Received an unexpected response format from the server.")
    );
}

#[tokio::test]
async fn test_latest_list_wins() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/routes"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(30, &["slow"]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_page(&server, 2, 10, page_body(30, &["fast"])).await;

    let (slow, fast) = tokio::join!(controller.list(1, 10), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.list(2, 10).await
    });

    assert!(matches!(slow, Err(CoreError::Superseded)), "got: {slow:?}");
    assert_eq!(fast.unwrap().page, 2);

    let state = controller.state();
    assert_eq!(state.pagination.page(), 2);
    assert_eq!(state.items[0].key, "/apisix/routes/fast");
}

// ── Single-route operations ─────────────────────────────────────────

#[tokio::test]
async fn test_get_normalizes_route() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/routes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/r1",
            "value": { "id": "r1", "uri": "/hello", "host": "a.example.com", "status": 0 }
        })))
        .mount(&server)
        .await;

    let route = assert_ok!(controller.get("r1").await);
    assert_eq!(route.uris, ["/hello"]);
    assert_eq!(route.hosts, ["a.example.com"]);
    assert!(route.methods.is_empty());
    assert_eq!(route.status, RouteStatus::Disabled);
}

#[tokio::test]
async fn test_create_without_id_posts() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/routes"))
        .and(body_json(json!({
            "uri": "/",
            "priority": 0,
            "status": 1,
            "enable_websocket": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "key": "/apisix/routes/100",
            "value": { "id": "100", "uri": "/" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = assert_ok!(controller.create(&Route::default()).await).unwrap();
    assert_eq!(created.id.as_deref(), Some("100"));
}

#[tokio::test]
async fn test_create_with_id_puts() {
    let (server, controller) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/routes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/r1",
            "value": { "id": "r1", "uri": "/" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let route = Route {
        id: Some("r1".into()),
        ..Route::default()
    };
    assert_ok!(controller.create(&route).await);
}

#[tokio::test]
async fn test_update_puts_shaped_payload() {
    let (server, controller) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/routes/r7"))
        .and(body_json(json!({
            "uris": ["/a", "/b"],
            "methods": ["GET"],
            "priority": 2,
            "status": 1,
            "enable_websocket": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": { "id": "r7" } })))
        .expect(1)
        .mount(&server)
        .await;

    let route = Route {
        uris: vec!["/a".into(), "/b".into(), "  ".into()],
        methods: vec!["GET".into()],
        priority: 2,
        enable_websocket: true,
        ..Route::default()
    };
    let saved = assert_ok!(controller.update("r7", &route).await);
    assert_eq!(saved.unwrap().id.as_deref(), Some("r7"));
}

#[tokio::test]
async fn test_update_keeps_unedited_server_fields() {
    let (server, controller) = setup().await;
    let plugins = json!({ "limit-count": { "count": 2, "time_window": 60, "key": "remote_addr" } });
    let upstream = json!({ "type": "roundrobin", "nodes": { "127.0.0.1:1980": 1 } });

    Mock::given(method("GET"))
        .and(path("/routes/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "/apisix/routes/r1",
            "value": {
                "id": "r1",
                "uri": "/a",
                "plugins": plugins,
                "upstream": upstream,
                "create_time": 1_700_000_000
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/routes/r1"))
        .and(body_json(json!({
            "id": "r1",
            "name": "renamed",
            "uri": "/a",
            "priority": 0,
            "status": 1,
            "enable_websocket": false,
            "plugins": plugins,
            "upstream": upstream
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "id": "r1", "uri": "/a", "name": "renamed", "plugins": plugins }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut route = assert_ok!(controller.get("r1").await);
    route.name = Some("renamed".into());
    let saved = assert_ok!(controller.update("r1", &route).await).unwrap();
    assert_eq!(saved.extra["plugins"], plugins);
}

#[tokio::test]
async fn test_missing_uri_is_rejected_before_request() {
    let (server, controller) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let route = Route {
        uris: vec![String::new()],
        ..Route::default()
    };
    let err = assert_err!(controller.create(&route).await);
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    let err = assert_err!(controller.update("r1", &route).await);
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_missing_config_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let controller = RouteController::new(None, &TransportConfig::default()).unwrap();

    let err = assert_err!(controller.list(1, 10).await);
    assert!(matches!(err, CoreError::ConfigurationMissing));
    let err = assert_err!(controller.get("r1").await);
    assert!(matches!(err, CoreError::ConfigurationMissing));
}

// ── Delete workflow ─────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_delete_keeps_dialog_open() {
    let (server, controller) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/routes/r1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Key not found" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(controller.request_delete("r1"));
    let err = assert_err!(controller.confirm_delete().await);
    assert_eq!(err.status(), Some(404));

    assert_eq!(
        controller.state().delete,
        DeleteWorkflow::Open {
            target: "r1".into(),
            error: Some("Key not found".into()),
        }
    );

    assert_ok!(controller.cancel_delete());
    assert_eq!(controller.state().delete, DeleteWorkflow::Closed);
}

#[tokio::test]
async fn test_successful_delete_closes_and_refreshes() {
    let (server, controller) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/routes/r2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": "1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/routes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, &["r1"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut rx = controller.subscribe();
    assert_ok!(controller.request_delete("r2"));
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().delete.target(), Some("r2"));

    assert_ok!(controller.confirm_delete().await);

    let state = controller.state();
    assert_eq!(state.delete, DeleteWorkflow::Closed);
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn test_confirm_without_request_is_refused() {
    let (_server, controller) = setup().await;
    let err = assert_err!(controller.confirm_delete().await);
    assert!(matches!(err, CoreError::NoDeletePending));
}
