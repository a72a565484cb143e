use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_pod::{app, app_with_store, Db, Entry};
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn put_text(uri: &str) -> http::request::Builder {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "text/plain")
}

async fn send(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

// --- containers ---

#[tokio::test]
async fn head_missing_container_returns_404() {
    let resp = send(&app(), request("HEAD", "/notes/")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_container_creates_then_reports_ok() {
    let app = app();
    let created = send(&app, request("PUT", "/notes/")).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let again = send(&app, request("PUT", "/notes/")).await;
    assert_eq!(again.status(), StatusCode::OK);

    let probe = send(&app, request("HEAD", "/notes/")).await;
    assert_eq!(probe.status(), StatusCode::OK);
    assert!(probe.headers().contains_key(http::header::ETAG));
}

#[tokio::test]
async fn get_container_lists_children() {
    let app = app();
    send(&app, put_text("/notes/a.txt").body("a\n".to_string()).unwrap()).await;
    send(&app, put_text("/notes/b.txt").body("b\n".to_string()).unwrap()).await;

    let resp = send(&app, request("GET", "/notes/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "text/turtle"
    );
    assert_eq!(body_text(resp).await, "/notes/a.txt\n/notes/b.txt\n");
}

// --- resources ---

#[tokio::test]
async fn put_then_get_resource() {
    let app = app();
    let created = send(&app, put_text("/notes/a.txt").body("one\ntwo\n".to_string()).unwrap()).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let resp = send(&app, request("GET", "/notes/a.txt")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/plain");
    assert_eq!(body_text(resp).await, "one\ntwo\n");
}

#[tokio::test]
async fn put_existing_resource_replaces_it() {
    let app = app();
    send(&app, put_text("/notes/a.txt").body("old\n".to_string()).unwrap()).await;
    let replaced = send(&app, put_text("/notes/a.txt").body("new\n".to_string()).unwrap()).await;
    assert_eq!(replaced.status(), StatusCode::OK);

    let resp = send(&app, request("GET", "/notes/a.txt")).await;
    assert_eq!(body_text(resp).await, "new\n");
}

#[tokio::test]
async fn put_resource_creates_parent_containers() {
    let db = Db::default();
    let app = app_with_store(db.clone());
    send(&app, put_text("/a/b/c.txt").body("x\n".to_string()).unwrap()).await;

    let store = db.read().await;
    assert!(matches!(store.get("/a/"), Some(Entry::Container { .. })));
    assert!(matches!(store.get("/a/b/"), Some(Entry::Container { .. })));
    assert!(matches!(
        store.get("/a/b/c.txt"),
        Some(Entry::Resource { body, .. }) if body == "x\n"
    ));
}

#[tokio::test]
async fn get_missing_resource_returns_404() {
    let resp = send(&app(), request("GET", "/notes/missing.txt")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resource_over_container_conflicts() {
    let app = app();
    send(&app, request("PUT", "/notes/")).await;
    let resp = send(&app, put_text("/notes").body(String::new()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let resp = send(&app(), request("DELETE", "/notes/a.txt")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- preconditions ---

#[tokio::test]
async fn if_match_accepts_current_etag_only() {
    let app = app();
    send(&app, put_text("/notes/a.txt").body("a\n".to_string()).unwrap()).await;
    let head = send(&app, request("HEAD", "/notes/a.txt")).await;
    let etag = head.headers()[http::header::ETAG].to_str().unwrap().to_string();

    let stale = send(
        &app,
        put_text("/notes/a.txt")
            .header(http::header::IF_MATCH, "\"999\"")
            .body("b\n".to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::PRECONDITION_FAILED);

    let fresh = send(
        &app,
        put_text("/notes/a.txt")
            .header(http::header::IF_MATCH, etag.as_str())
            .body("b\n".to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(fresh.status(), StatusCode::OK);

    let reused = send(
        &app,
        put_text("/notes/a.txt")
            .header(http::header::IF_MATCH, etag.as_str())
            .body("c\n".to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn if_none_match_star_only_creates() {
    let app = app();
    let first = send(
        &app,
        put_text("/notes/a.txt")
            .header(http::header::IF_NONE_MATCH, "*")
            .body("a\n".to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(
        &app,
        put_text("/notes/a.txt")
            .header(http::header::IF_NONE_MATCH, "*")
            .body("b\n".to_string())
            .unwrap(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::PRECONDITION_FAILED);
}
