use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

/// Caller identity attached to every request. Empty when no valid token was sent.
#[derive(Clone, Debug, Default)]
pub struct Session(pub Option<AuthUser>);

impl Session {
    /// The authenticated user, or 401
    pub fn require(&self) -> Result<&AuthUser, ApiError> {
        self.0.as_ref().ok_or_else(|| ApiError::unauthorized("Unauthenticated"))
    }
}

/// Resolves the bearer token, if any, into a [`Session`] extension.
///
/// Rejection is left to the handlers: public reads ignore the session and
/// mutating routes call [`Session::require`] after validating their input.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = match extract_jwt_from_headers(request.headers()) {
        Ok(Some(token)) => match state.sessions.verify(token) {
            Ok(claims) => Session(Some(AuthUser::from(claims))),
            Err(e) => {
                tracing::debug!("Ignoring bearer token: {}", e);
                Session(None)
            }
        },
        Ok(None) => Session(None),
        Err(msg) => {
            tracing::debug!("Ignoring Authorization header: {}", msg);
            Session(None)
        }
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_jwt_from_headers(&headers), Ok(None));

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers), Ok(Some("abc.def.ghi")));

        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert!(extract_jwt_from_headers(&headers).is_err());
    }

    #[test]
    fn empty_session_requires_login() {
        let err = Session::default().require().unwrap_err();
        assert_eq!(err.status_code(), 401);

        let session = Session(Some(AuthUser { user_id: "user_1".into() }));
        assert_eq!(session.require().unwrap().user_id, "user_1");
    }
}
