mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn health_reports_catalog_ok() {
    let app = TestApp::new();
    let res = app.get("/health", None).await;
    res.assert_ok();
    assert_eq!(res.data()["status"], "ok");
    assert_eq!(res.data()["database"], "ok");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = TestApp::new();
    let res = app.get("/", None).await;
    res.assert_ok();
    assert_eq!(res.data()["name"], "Storefront Admin API");
    assert!(res.data()["endpoints"]["products"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::new();
    let res = app.get("/api/nowhere/at/all/here", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
