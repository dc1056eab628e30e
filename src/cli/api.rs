use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, with the server's envelope fields when present
    #[error("{status}: {message}")]
    Http {
        status: StatusCode,
        message: String,
        code: Option<String>,
    },

    #[error("unexpected response: {0}")]
    Envelope(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin JSON client for the admin API. Unwraps the `{"success", "data"}` envelope.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base: Url::parse(server_url)?,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.send(Method::DELETE, path, None).await
    }

    /// True when `/health` answers 2xx within a few seconds
    pub async fn ping(&self) -> bool {
        let Ok(url) = self.base.join("/health") else {
            return false;
        };
        matches!(
            self.http.get(url).timeout(Duration::from_secs(5)).send().await,
            Ok(response) if response.status().is_success()
        )
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        let url = self.base.join(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let envelope: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = envelope
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| text.clone());
            let code = envelope
                .as_ref()
                .and_then(|v| v.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(ClientError::Http { status, message, code });
        }

        match envelope {
            Some(Value::Object(mut object)) => object
                .remove("data")
                .ok_or_else(|| ClientError::Envelope("missing data field".to_string())),
            _ => Err(ClientError::Envelope(text)),
        }
    }
}
