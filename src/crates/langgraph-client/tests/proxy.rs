// POST /api/proxy behaviour

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use langgraph_client::{proxy_router, ProxyRequest, ProxyState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn spawn_upstream() -> String {
    async fn echo(headers: HeaderMap, body: Option<Json<Value>>) -> Json<Value> {
        Json(json!({
            "api_key": headers.get("x-api-key").and_then(|v| v.to_str().ok()),
            "content_type": headers.get("content-type").and_then(|v| v.to_str().ok()),
            "body": body.map(|Json(b)| b),
        }))
    }

    async fn missing() -> (StatusCode, &'static str) {
        (StatusCode::NOT_FOUND, "no such thread")
    }

    async fn not_json() -> &'static str {
        "plain text"
    }

    let router = Router::new()
        .route("/echo", post(echo).get(echo))
        .route("/missing", get(missing))
        .route("/text", get(not_json));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn call(state: ProxyState, body: String) -> (StatusCode, HeaderMap, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/proxy")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let resp = proxy_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

fn request(api_url: &str, path: &str, method: &str, body: Option<Value>) -> String {
    serde_json::to_string(&ProxyRequest {
        api_url: api_url.to_string(),
        path: path.to_string(),
        method: method.to_string(),
        body,
    })
    .unwrap()
}

fn assert_failure(status: StatusCode, headers: &HeaderMap, body: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body, &json!({"error": "Failed to proxy request"}));
}

#[tokio::test]
async fn forwards_body_and_api_key() {
    let upstream = spawn_upstream().await;
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(
        state,
        request(&upstream, "/echo", "post", Some(json!({"limit": 10}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body["api_key"], "lsv2_proxy");
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["body"], json!({"limit": 10}));
}

#[tokio::test]
async fn omits_body_when_absent() {
    let upstream = spawn_upstream().await;
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, _, body) = call(state, request(&upstream, "/echo", "GET", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"], Value::Null);
}

#[tokio::test]
async fn upstream_error_status_is_500() {
    let upstream = spawn_upstream().await;
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(state, request(&upstream, "/missing", "GET", None)).await;

    assert_failure(status, &headers, &body);
}

#[tokio::test]
async fn non_json_upstream_is_500() {
    let upstream = spawn_upstream().await;
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(state, request(&upstream, "/text", "GET", None)).await;

    assert_failure(status, &headers, &body);
}

#[tokio::test]
async fn unreachable_upstream_is_500() {
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(state, request("http://127.0.0.1:1", "/info", "GET", None)).await;

    assert_failure(status, &headers, &body);
}

#[tokio::test]
async fn bad_method_is_500() {
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(state, request("http://127.0.0.1:1", "/info", "NOT A METHOD", None)).await;

    assert_failure(status, &headers, &body);
}

#[tokio::test]
async fn malformed_request_is_500() {
    let state = ProxyState::new(Some("lsv2_proxy")).unwrap();

    let (status, headers, body) = call(state, r#"{"path": "/info"}"#.to_string()).await;

    assert_failure(status, &headers, &body);
}
