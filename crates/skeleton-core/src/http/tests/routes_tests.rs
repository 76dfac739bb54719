use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use tower::ServiceExt;

use crate::http::RouteTable;

async fn status_of(router: Router, uri: &str) -> StatusCode {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[test]
fn test_new_table_is_empty() {
    let table = RouteTable::new();
    assert!(table.is_empty());
    assert!(table.names().is_empty());
}

#[tokio::test]
async fn test_groups_are_merged() {
    let table = RouteTable::new();
    table.add("home", Router::new().route("/", get(|| async { "home" })));
    table.add("ping", Router::new().route("/ping", get(|| async { "pong" })));

    assert_eq!(table.names(), vec!["home", "ping"]);

    let router = table.router();
    assert_eq!(status_of(router.clone(), "/").await, StatusCode::OK);
    assert_eq!(status_of(router.clone(), "/ping").await, StatusCode::OK);
    assert_eq!(status_of(router, "/missing").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_same_group_name_replaces() {
    let table = RouteTable::new();
    table.add("api", Router::new().route("/old", get(|| async { "old" })));
    table.add("api", Router::new().route("/new", get(|| async { "new" })));

    assert_eq!(table.names(), vec!["api"]);
    let router = table.router();
    assert_eq!(status_of(router.clone(), "/new").await, StatusCode::OK);
    assert_eq!(status_of(router, "/old").await, StatusCode::NOT_FOUND);
}
