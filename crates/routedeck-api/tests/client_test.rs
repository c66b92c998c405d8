#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use reqwest::Method;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use routedeck_api::types::RouteListResponse;
use routedeck_api::{ApiClient, ApiConfig, Error, ErrorKind, RequestBody};

// ── Helpers ─────────────────────────────────────────────────────────

const PREFIX: &str = "/apisix/admin";

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let config = ApiConfig::new(format!("{}{PREFIX}", server.uri()), "edd1c9f034335f136f87ad84b625c8f1");
    let client = ApiClient::with_client(Some(config), reqwest::Client::new());
    (server, client)
}

fn admin_path(suffix: &str) -> String {
    format!("{PREFIX}{suffix}")
}

// ── Configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_config_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::with_client(None, reqwest::Client::new());
    let result: Result<Option<Value>, Error> = client.get("/routes").await;

    let err = result.unwrap_err();
    assert!(matches!(err, Error::ConfigurationMissing), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::ConfigurationMissing);
    assert!(!client.is_configured());
}

#[tokio::test]
async fn test_empty_api_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = ApiConfig::new(server.uri(), "");
    let client = ApiClient::with_client(Some(config), reqwest::Client::new());

    let err = client.delete_route("1").await.unwrap_err();
    assert!(matches!(err, Error::ConfigurationMissing), "got: {err:?}");
}

// ── Request shape ───────────────────────────────────────────────────

#[tokio::test]
async fn test_headers_and_verbatim_url() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(admin_path("/routes/r1")))
        .and(header("X-API-KEY", "edd1c9f034335f136f87ad84b625c8f1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "value": { "id": "r1", "uri": "/hello" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let route = client.get_route("r1").await.unwrap();
    assert_eq!(route.id.as_deref(), Some("r1"));
    assert_eq!(route.uri.as_deref(), Some("/hello"));
}

#[tokio::test]
async fn test_json_body_is_serialized() {
    let (server, client) = setup().await;

    let payload = json!({ "uri": "/a", "priority": 0, "status": 1, "enable_websocket": false });
    Mock::given(method("POST"))
        .and(path(admin_path("/routes")))
        .and(body_json(&payload))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "key": "/apisix/routes/123", "value": { "id": "123", "uri": "/a" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client.post_route(&payload).await.unwrap().unwrap();
    assert_eq!(created.id.as_deref(), Some("123"));
}

#[tokio::test]
async fn test_text_body_is_sent_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(admin_path("/routes/raw")))
        .and(body_string(r#"{"uri":"/raw"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": { "id": "raw" } })))
        .expect(1)
        .mount(&server)
        .await;

    let body: Option<Value> = client
        .request(
            Method::PUT,
            "/routes/raw",
            Some(RequestBody::Text(r#"{"uri":"/raw"}"#.into())),
        )
        .await
        .unwrap();
    assert!(body.is_some());
}

#[tokio::test]
async fn test_list_routes_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(admin_path("/routes")))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 21,
            "list": [{ "key": "/apisix/routes/21", "value": { "id": "21", "uris": ["/x", "/y"] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    match client.list_routes(2, 20).await.unwrap() {
        RouteListResponse::Page { total, list } => {
            assert_eq!(total, 21);
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].key, "/apisix/routes/21");
        }
        other @ RouteListResponse::Rejected { .. } => panic!("expected page, got {other:?}"),
    }
}

// ── No-content handling ─────────────────────────────────────────────

#[tokio::test]
async fn test_no_content_resolves_to_none() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path(admin_path("/routes/1")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(admin_path("/empty")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let deleted: Option<Value> = client.delete("/routes/1").await.unwrap();
    assert!(deleted.is_none());

    let empty: Option<Value> = client.get("/empty").await.unwrap();
    assert!(empty.is_none());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_body_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(admin_path("/routes/missing")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Key not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_route("missing").await.unwrap_err();
    match err {
        Error::Api {
            status,
            ref message,
            ref data,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Key not found");
            assert_eq!(data["message"], "Key not found");
        }
        ref other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_error_msg_field_is_used() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error_msg": "invalid configuration: property \"uri\" validation failed" })),
        )
        .mount(&server)
        .await;

    let err = client.put_route("r1", &json!({})).await.unwrap_err();
    assert!(
        err.to_string().contains("property \"uri\" validation failed"),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_json_error_without_message_uses_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "code": 1 })))
        .mount(&server)
        .await;

    let result: Result<Option<Value>, Error> = client.get("/routes").await;
    match result {
        Err(Error::Api { message, .. }) => {
            assert_eq!(message, "API request failed with status 500");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_uses_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client.get_route("1").await.unwrap_err();
    match err {
        Error::Api {
            status,
            ref message,
            ref data,
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
            assert_eq!(data, &json!({ "message": "Unauthorized" }));
        }
        ref other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_route("1").await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_unexpected_list_shape() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(admin_path("/routes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "nodes": [] })))
        .mount(&server)
        .await;

    let err = client.list_routes(1, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedResponseShape);
}

#[tokio::test]
async fn test_unreachable_host() {
    // Bind an ephemeral port and release it so nothing is listening there.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let client = ApiClient::with_client(Some(ApiConfig::new(uri, "key")), reqwest::Client::new());

    let err = client.get_route("1").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_connect());
    assert!(err.is_transient());
}
