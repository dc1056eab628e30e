mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use common::{token_for, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn store_endpoints_require_a_session() {
    let app = TestApp::new();
    app.get("/api/stores", None).await.assert_error(StatusCode::UNAUTHORIZED);

    let res = app.post("/api/stores", None, json!({ "name": "Main" })).await;
    res.assert_error(StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Unauthenticated");

    // A token signed with another secret is treated as no session at all
    let forged = storefront_admin::auth::generate_jwt(
        "some-other-secret",
        &storefront_admin::auth::Claims::new("user_1", 1),
    )
    .unwrap();
    app.get("/api/stores", Some(&forged))
        .await
        .assert_error(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_validates_before_checking_the_session() {
    let app = TestApp::new();
    let res = app.post("/api/stores", None, json!({ "name": "" })).await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(
        res.body["field_errors"]["name"],
        "String must contain at least 1 character(s)"
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/stores")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.send(request).await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn stores_are_listed_oldest_first_per_owner() {
    let app = TestApp::new();
    let alice = token_for("user_alice");
    let bob = token_for("user_bob");

    let first = app.store(&alice, "First").await;
    let second = app.store(&alice, "Second").await;
    app.store(&bob, "Elsewhere").await;

    let res = app.get("/api/stores", Some(&alice)).await;
    res.assert_ok();
    let ids: Vec<&str> = res.data().as_array().unwrap().iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(res.data()[0]["userId"], "user_alice");
}

#[tokio::test]
async fn foreign_and_missing_stores_look_the_same() {
    let app = TestApp::new();
    let alice = token_for("user_alice");
    let bob = token_for("user_bob");
    let store = app.store(&alice, "Main").await;

    for uri in [format!("/api/stores/{}", store), format!("/api/stores/{}", Uuid::new_v4())] {
        let res = app.get(&uri, Some(&bob)).await;
        res.assert_error(StatusCode::FORBIDDEN);
        assert_eq!(res.body["error"], "Unauthorized");

        app.patch(&uri, Some(&bob), json!({ "name": "Taken over" }))
            .await
            .assert_error(StatusCode::FORBIDDEN);
        app.delete(&uri, Some(&bob)).await.assert_error(StatusCode::FORBIDDEN);
    }

    app.get("/api/stores/not-a-uuid", Some(&alice))
        .await
        .assert_error(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rename_uses_the_settings_schema() {
    let app = TestApp::new();
    let alice = token_for("user_alice");
    let store = app.store(&alice, "Main").await;
    let uri = format!("/api/stores/{}", store);

    let res = app.patch(&uri, Some(&alice), json!({ "name": "X" })).await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["field_errors"]["name"],
        "String must contain at least 2 character(s)"
    );

    let res = app.patch(&uri, Some(&alice), json!({ "name": "Outlet" })).await;
    res.assert_ok();
    assert_eq!(res.data()["name"], "Outlet");
    assert_eq!(app.get(&uri, Some(&alice)).await.data()["name"], "Outlet");
}

#[tokio::test]
async fn store_delete_is_refused_while_rows_remain() {
    let app = TestApp::new();
    let alice = token_for("user_alice");
    let store = app.store(&alice, "Main").await;
    let billboard = app.billboard(&alice, &store, "Summer").await;
    let uri = format!("/api/stores/{}", store);

    app.delete(&uri, Some(&alice))
        .await
        .assert_error(StatusCode::UNPROCESSABLE_ENTITY);

    app.delete(&format!("/api/{}/billboards/{}", store, billboard), Some(&alice))
        .await
        .assert_ok();
    let res = app.delete(&uri, Some(&alice)).await;
    res.assert_ok();
    assert_eq!(res.id(), store);

    app.get(&uri, Some(&alice)).await.assert_error(StatusCode::FORBIDDEN);
}
