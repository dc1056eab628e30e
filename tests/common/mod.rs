#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_admin::auth::{generate_jwt, Claims};
use storefront_admin::config::AppConfig;
use storefront_admin::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// A signed session token for `user_id`
pub fn token_for(user_id: &str) -> String {
    generate_jwt(SECRET, &Claims::new(user_id, 1)).expect("failed to sign test token")
}

/// Status plus parsed JSON body (Null when the body is empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .unwrap_or_else(|| panic!("response has no data.id: {}", self.body))
            .to_string()
    }

    pub fn assert_ok(&self) -> &Self {
        assert_eq!(self.status, StatusCode::OK, "unexpected body: {}", self.body);
        assert_eq!(self.body["success"], json!(true));
        self
    }

    pub fn assert_error(&self, status: StatusCode) -> &Self {
        assert_eq!(self.status, status, "unexpected body: {}", self.body);
        assert_eq!(self.body["success"], json!(false));
        self
    }
}

/// In-process application over a fresh memory catalog
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(AppConfig::for_tests(SECRET));
        Self { router: app(state) }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("failed to build request")).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Create a store for the token's owner and return its id
    pub async fn store(&self, token: &str, name: &str) -> String {
        let res = self.post("/api/stores", Some(token), json!({ "name": name })).await;
        res.assert_ok();
        res.id()
    }

    pub async fn billboard(&self, token: &str, store_id: &str, label: &str) -> String {
        let res = self
            .post(
                &format!("/api/{}/billboards", store_id),
                Some(token),
                json!({ "label": label, "imageUrl": format!("https://cdn.test/{}.png", label) }),
            )
            .await;
        res.assert_ok();
        res.id()
    }

    pub async fn category(&self, token: &str, store_id: &str, billboard_id: &str, name: &str) -> String {
        let res = self
            .post(
                &format!("/api/{}/categories", store_id),
                Some(token),
                json!({ "name": name, "billboardId": billboard_id }),
            )
            .await;
        res.assert_ok();
        res.id()
    }

    pub async fn color(&self, token: &str, store_id: &str, name: &str, value: &str) -> String {
        let res = self
            .post(
                &format!("/api/{}/colors", store_id),
                Some(token),
                json!({ "name": name, "value": value }),
            )
            .await;
        res.assert_ok();
        res.id()
    }

    pub async fn size(&self, token: &str, store_id: &str, name: &str, value: &str) -> String {
        let res = self
            .post(
                &format!("/api/{}/sizes", store_id),
                Some(token),
                json!({ "name": name, "value": value }),
            )
            .await;
        res.assert_ok();
        res.id()
    }
}

/// Ids of a store with one of every product dependency
pub struct Fixture {
    pub token: String,
    pub store_id: String,
    pub billboard_id: String,
    pub category_id: String,
    pub color_id: String,
    pub size_id: String,
    /// Set by [`Fixture::with_product`]
    pub product_id: Option<String>,
}

impl Fixture {
    pub async fn build(app: &TestApp, user_id: &str) -> Self {
        let token = token_for(user_id);
        let store_id = app.store(&token, "Main").await;
        let billboard_id = app.billboard(&token, &store_id, "Summer").await;
        let category_id = app.category(&token, &store_id, &billboard_id, "Shirts").await;
        let color_id = app.color(&token, &store_id, "Black", "#000000").await;
        let size_id = app.size(&token, &store_id, "Large", "L").await;
        Self {
            token,
            store_id,
            billboard_id,
            category_id,
            color_id,
            size_id,
            product_id: None,
        }
    }

    /// Same as [`Fixture::build`] plus one product using every dependency
    pub async fn with_product(app: &TestApp, user_id: &str) -> Self {
        let mut fx = Self::build(app, user_id).await;
        let res = app
            .post(&fx.path("products"), Some(&fx.token), fx.product_body("Tee", 19.99))
            .await;
        res.assert_ok();
        fx.product_id = Some(res.id());
        fx
    }

    pub fn product_body(&self, name: &str, price: f64) -> Value {
        json!({
            "name": name,
            "price": price,
            "categoryId": self.category_id,
            "colorId": self.color_id,
            "sizeId": self.size_id,
            "images": [{ "url": format!("https://cdn.test/{}.png", name) }]
        })
    }

    pub fn path(&self, segment: &str) -> String {
        format!("/api/{}/{}", self.store_id, segment)
    }
}

/// Serve the application on a free local port for clients that speak real HTTP
pub async fn spawn_server() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    let router = app(AppState::in_memory(AppConfig::for_tests(SECRET)));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(format!("http://127.0.0.1:{}", port))
}
