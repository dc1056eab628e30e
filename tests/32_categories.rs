mod common;

use axum::http::StatusCode;
use common::{token_for, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn categories_embed_their_billboard() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;
    let billboard = app.billboard(&token, &store, "Summer").await;
    let category = app.category(&token, &store, &billboard, "Shirts").await;

    let res = app.get(&format!("/api/{}/categories", store), None).await;
    res.assert_ok();
    assert_eq!(res.data()[0]["id"], category.as_str());
    assert_eq!(res.data()[0]["billboard"]["label"], "Summer");

    let res = app
        .get(&format!("/api/{}/categories/{}", store, category), None)
        .await;
    res.assert_ok();
    assert_eq!(res.data()["billboardId"], billboard.as_str());
    assert_eq!(res.data()["billboard"]["id"], billboard.as_str());
}

#[tokio::test]
async fn category_needs_an_existing_billboard() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;

    let res = app
        .post(
            &format!("/api/{}/categories", store),
            Some(&token),
            json!({ "name": "Shirts", "billboardId": Uuid::new_v4() }),
        )
        .await;
    res.assert_error(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["error"], "Referenced records prevent this operation");

    let res = app.get(&format!("/api/{}/categories", store), None).await;
    assert_eq!(res.data(), &json!([]));
}

#[tokio::test]
async fn category_schema_is_enforced() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;

    let res = app
        .post(
            &format!("/api/{}/categories", store),
            Some(&token),
            json!({ "name": "S", "billboardId": "" }),
        )
        .await;
    res.assert_error(StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body["field_errors"]["name"],
        "String must contain at least 2 character(s)"
    );
    assert!(res.body["field_errors"]["billboardId"].is_string());
}

#[tokio::test]
async fn category_update_moves_it_to_another_billboard() {
    let app = TestApp::new();
    let token = token_for("user_alice");
    let store = app.store(&token, "Main").await;
    let summer = app.billboard(&token, &store, "Summer").await;
    let winter = app.billboard(&token, &store, "Winter").await;
    let category = app.category(&token, &store, &summer, "Shirts").await;
    let item = format!("/api/{}/categories/{}", store, category);

    let res = app
        .patch(&item, Some(&token), json!({ "name": "Coats", "billboardId": winter }))
        .await;
    res.assert_ok();
    assert_eq!(res.data()["name"], "Coats");
    assert_eq!(app.get(&item, None).await.data()["billboard"]["label"], "Winter");

    // Summer is free again
    app.delete(&format!("/api/{}/billboards/{}", store, summer), Some(&token))
        .await
        .assert_ok();

    let missing = format!("/api/{}/categories/{}", store, Uuid::new_v4());
    app.patch(&missing, Some(&token), json!({ "name": "Coats", "billboardId": winter }))
        .await
        .assert_error(StatusCode::NOT_FOUND);

    app.delete(&item, Some(&token)).await.assert_ok();
    app.get(&item, None).await.assert_error(StatusCode::NOT_FOUND);
}
