mod common;

use axum::http::StatusCode;
use common::{token_for, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn billboards_round_trip_through_the_store() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;
    let collection = format!("/api/{}/billboards", store);

    let res = app
        .post(&collection, Some(&token), json!({ "label": "Summer", "imageUrl": "https://cdn.test/s.png" }))
        .await;
    res.assert_ok();
    assert_eq!(res.data()["storeId"], store.as_str());
    assert_eq!(res.data()["imageUrl"], "https://cdn.test/s.png");
    let id = res.id();
    let item = format!("{}/{}", collection, id);

    let res = app
        .patch(&item, Some(&token), json!({ "label": "Winter", "imageUrl": "https://cdn.test/w.png" }))
        .await;
    res.assert_ok();
    assert_eq!(res.data()["label"], "Winter");

    // Reads are public
    let res = app.get(&item, None).await;
    res.assert_ok();
    assert_eq!(res.data()["label"], "Winter");

    app.delete(&item, Some(&token)).await.assert_ok();
    let res = app.get(&item, None).await;
    res.assert_error(StatusCode::NOT_FOUND);
    assert_eq!(res.body["error"], "Billboard not found");
}

#[tokio::test]
async fn billboards_are_listed_newest_first() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;
    let older = app.billboard(&token, &store, "Older").await;
    let newer = app.billboard(&token, &store, "Newer").await;

    let res = app.get(&format!("/api/{}/billboards", store), None).await;
    res.assert_ok();
    let ids: Vec<&str> = res.data().as_array().unwrap().iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![newer.as_str(), older.as_str()]);
}

#[tokio::test]
async fn writes_check_body_then_session_then_ownership() {
    let app = TestApp::new();
    let alice = token_for("user_alice");
    let bob = token_for("user_bob");
    let store = app.store(&alice, "Main").await;
    let collection = format!("/api/{}/billboards", store);
    let valid = json!({ "label": "Summer", "imageUrl": "https://cdn.test/s.png" });

    let res = app.post(&collection, None, json!({ "label": "" })).await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(res.body["field_errors"]["imageUrl"], "Required");

    app.post(&collection, None, valid.clone())
        .await
        .assert_error(StatusCode::UNAUTHORIZED);
    app.post(&collection, Some(&bob), valid.clone())
        .await
        .assert_error(StatusCode::FORBIDDEN);
    app.post(&format!("/api/{}/billboards", Uuid::new_v4()), Some(&alice), valid)
        .await
        .assert_error(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn items_are_scoped_to_their_store() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let main = app.store(&token, "Main").await;
    let outlet = app.store(&token, "Outlet").await;
    let billboard = app.billboard(&token, &main, "Summer").await;

    let foreign = format!("/api/{}/billboards/{}", outlet, billboard);
    app.get(&foreign, None).await.assert_error(StatusCode::NOT_FOUND);
    app.patch(&foreign, Some(&token), json!({ "label": "x", "imageUrl": "y" }))
        .await
        .assert_error(StatusCode::NOT_FOUND);
    app.delete(&foreign, Some(&token)).await.assert_error(StatusCode::NOT_FOUND);

    let res = app.get(&format!("/api/{}/billboards", outlet), None).await;
    assert_eq!(res.data(), &json!([]));
}

#[tokio::test]
async fn billboard_in_use_cannot_be_deleted() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;
    let billboard = app.billboard(&token, &store, "Summer").await;
    app.category(&token, &store, &billboard, "Shirts").await;

    let res = app
        .delete(&format!("/api/{}/billboards/{}", store, billboard), Some(&token))
        .await;
    res.assert_error(StatusCode::UNPROCESSABLE_ENTITY);

    app.get(&format!("/api/{}/billboards/{}", store, billboard), None)
        .await
        .assert_ok();
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = TestApp::new();
    let res = app.get("/api/not-a-store/billboards", None).await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "storeId must be a valid uuid");

    let res = app
        .get(&format!("/api/{}/billboards/nope", Uuid::new_v4()), None)
        .await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "billboardId must be a valid uuid");
}
