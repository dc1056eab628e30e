mod common;

use common::{spawn_server, token_for};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use storefront_admin::cli::api::{ApiClient, ClientError};
use storefront_admin::cli::form::{Form, FormSpec};
use storefront_admin::cli::listing::Table;
use storefront_admin::types::Entity;

async fn client_for(user: &str) -> ApiClient {
    let base = spawn_server().await.expect("failed to start server");
    ApiClient::new(&base, Some(token_for(user))).unwrap()
}

async fn create_store(client: &ApiClient) -> Uuid {
    let mut form = Form::new(FormSpec::new_store(), None).unwrap();
    form.set("name", json!("Main"));
    let outcome = form.submit(client).await.unwrap();
    assert!(!outcome.toast.is_error(), "{:?}", outcome.toast);
    assert_eq!(outcome.toast.description, "Store created.");

    let id = outcome.data.unwrap()["id"].as_str().unwrap().to_string();
    assert_eq!(outcome.redirect, Some(format!("/{}", id)));
    Uuid::parse_str(&id).unwrap()
}

#[tokio::test]
async fn forms_create_edit_and_delete_over_http() {
    let client = client_for("user_alice").await;
    assert!(client.ping().await);
    let store = create_store(&client).await;

    let mut create = Form::new(FormSpec::entity(Entity::Billboard, store), None).unwrap();
    create.set("label", json!("Summer"));
    create.set("imageUrl", json!("https://cdn.test/s.png"));
    let outcome = create.submit(&client).await.unwrap();
    assert_eq!(outcome.toast.description, "Billboard created.");
    assert_eq!(outcome.redirect, Some(format!("/{}/billboards", store)));
    let created = outcome.data.unwrap();

    let mut edit = Form::new(FormSpec::entity(Entity::Billboard, store), Some(created.clone())).unwrap();
    assert_eq!(edit.heading(), "Edit billboard");
    edit.set("label", json!("Winter"));
    let outcome = edit.submit(&client).await.unwrap();
    assert_eq!(outcome.toast.description, "Billboard updated.");
    assert_eq!(outcome.data.unwrap()["label"], "Winter");

    let outcome = edit.delete(&client, || true).await.unwrap().unwrap();
    assert_eq!(outcome.toast.description, "Billboard deleted.");
    assert_eq!(outcome.redirect, Some(format!("/{}/billboards", store)));

    let err = client
        .get(&format!("/api/{}/billboards/{}", store, created["id"].as_str().unwrap()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn refused_delete_shows_the_dependents_hint() {
    let client = client_for("user_alice").await;
    let store = create_store(&client).await;

    let billboard = client
        .post(
            &format!("/api/{}/billboards", store),
            &json!({ "label": "Summer", "imageUrl": "https://cdn.test/s.png" }),
        )
        .await
        .unwrap();
    client
        .post(
            &format!("/api/{}/categories", store),
            &json!({ "name": "Shirts", "billboardId": billboard["id"] }),
        )
        .await
        .unwrap();

    let form = Form::new(FormSpec::entity(Entity::Billboard, store), Some(billboard)).unwrap();
    let outcome = form.delete(&client, || true).await.unwrap().unwrap();
    assert!(outcome.toast.is_error());
    assert_eq!(
        outcome.toast.description,
        "Make sure you removed all categories using this billboard first."
    );
    assert_eq!(outcome.redirect, None);
}

#[tokio::test]
async fn server_failures_become_generic_toasts() {
    let owner = client_for("user_alice").await;
    let store = create_store(&owner).await;

    let intruder = ApiClient::new(owner.base_url().as_str(), Some(token_for("user_mallory"))).unwrap();
    let mut form = Form::new(FormSpec::entity(Entity::Color, store), None).unwrap();
    form.set("name", json!("Black"));
    form.set("value", json!("#000"));
    let outcome = form.submit(&intruder).await.unwrap();
    assert_eq!(outcome.toast.title.as_deref(), Some("Something went wrong."));
    assert_eq!(outcome.toast.description, "Color created. fail. Please try again.");
    assert!(outcome.data.is_none());

    match intruder.get(&format!("/api/stores/{}", store)).await {
        Err(ClientError::Http { status, message, code }) => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(message, "Unauthorized");
            assert_eq!(code.as_deref(), Some("FORBIDDEN"));
        }
        other => panic!("expected 403, got {:?}", other),
    }
}

#[tokio::test]
async fn listing_renders_server_rows() {
    let client = client_for("user_alice").await;
    let store = create_store(&client).await;
    for (name, value) in [("Small", "S"), ("Large", "L")] {
        client
            .post(&format!("/api/{}/sizes", store), &json!({ "name": name, "value": value }))
            .await
            .unwrap();
    }

    let rows = match client.get(&format!("/api/{}/sizes", store)).await.unwrap() {
        Value::Array(rows) => rows,
        other => panic!("expected array, got {}", other),
    };
    let table = Table::for_entity(Entity::Size, &rows);
    assert_eq!(table.rows.len(), 2);
    let text = table.render_text();
    assert!(text.contains("Large"));
    assert!(text.find("Large").unwrap() < text.find("Small").unwrap());
}
