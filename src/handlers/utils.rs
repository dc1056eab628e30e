use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Store;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use crate::validation::Validate;

/// Request body parsed as JSON and checked against `T`'s schema.
///
/// Both malformed JSON and schema violations are rejected with 400, before
/// the handler runs and therefore before any session or ownership check.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        let candidate: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::invalid_json(format!("Invalid JSON body: {}", e)))?;

        Ok(ValidatedJson(T::validate(&candidate)?))
    }
}

/// Parse a path identifier, naming the parameter in the 400 message
pub fn parse_id(name: &str, raw: &str) -> Result<Uuid, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", name)));
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("{} must be a valid uuid", name)))
}

/// The store, if it exists and belongs to `user`.
///
/// A missing store and a store owned by someone else both yield 403, so
/// callers cannot discover store ids they do not own.
pub async fn owned_store(state: &AppState, store_id: Uuid, user: &AuthUser) -> Result<Store, ApiError> {
    state
        .catalog
        .owned_store(store_id, &user.user_id)
        .await
        .map_err(failure("STORE_OWNERSHIP"))?
        .ok_or_else(|| ApiError::forbidden("Unauthorized"))
}

/// Log a catalog failure under `tag` and convert it for the client
pub fn failure(tag: &'static str) -> impl Fn(DatabaseError) -> ApiError {
    move |err| {
        match &err {
            DatabaseError::ForeignKeyViolation(_) | DatabaseError::UniqueViolation(_) | DatabaseError::NotFound(_) => {
                tracing::info!("[{}] {}", tag, err)
            }
            _ => tracing::error!("[{}] {}", tag, err),
        }
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("storeId", &id.to_string()).unwrap(), id);

        let err = parse_id("storeId", "not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "storeId must be a valid uuid");

        assert_eq!(parse_id("colorId", " ").unwrap_err().message(), "colorId is required");
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logged_lines(f: impl FnOnce()) -> Vec<String> {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(String::from).collect()
    }

    #[test]
    fn catalog_failures_are_logged_once_under_their_tag() {
        let failures = [
            DatabaseError::ForeignKeyViolation("products_color_id_fkey".into()),
            DatabaseError::UniqueViolation("stores_pkey".into()),
            DatabaseError::QueryError("syntax error".into()),
        ];
        for err in failures {
            let lines = logged_lines(|| {
                let converted = failure("COLORS_DELETE")(err);
                assert!(converted.status_code() >= 400);
            });
            assert_eq!(lines.len(), 1, "{:?}", lines);
            assert!(lines[0].contains("[COLORS_DELETE]"));
        }

        let lines = logged_lines(|| {
            let _: ApiError = DatabaseError::UniqueViolation("stores_pkey".into()).into();
        });
        assert!(lines.is_empty(), "{:?}", lines);
    }
}
