use axum::extract::{Extension, Path, State};

use crate::database::models::Store;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::{SettingsInput, StoreInput};

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

/// GET /api/stores - Stores owned by the caller, oldest first
pub async fn list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Vec<Store>> {
    let user = session.require()?;
    let stores = state
        .catalog
        .list_stores(&user.user_id)
        .await
        .map_err(failure("STORES_GET"))?;
    Ok(ApiResponse::success(stores))
}

/// POST /api/stores
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<StoreInput>,
) -> ApiResult<Store> {
    let user = session.require()?;
    let store = state
        .catalog
        .create_store(&user.user_id, &input)
        .await
        .map_err(failure("STORES_POST"))?;
    tracing::info!("Store {} created for {}", store.id, user.user_id);
    Ok(ApiResponse::success(store))
}

/// GET /api/stores/:store_id
pub async fn show(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Store> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    let store = owned_store(&state, store_id, user).await?;
    Ok(ApiResponse::success(store))
}

/// PATCH /api/stores/:store_id - Rename through the settings form
pub async fn update(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<SettingsInput>,
) -> ApiResult<Store> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    let store = state
        .catalog
        .rename_store(store_id, &user.user_id, &input)
        .await
        .map_err(failure("STORE_PATCH"))?
        .ok_or_else(|| ApiError::forbidden("Unauthorized"))?;
    Ok(ApiResponse::success(store))
}

/// DELETE /api/stores/:store_id - Refused while the store still has catalog rows
pub async fn delete(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Store> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    let store = state
        .catalog
        .delete_store(store_id, &user.user_id)
        .await
        .map_err(failure("STORE_DELETE"))?
        .ok_or_else(|| ApiError::forbidden("Unauthorized"))?;
    tracing::info!("Store {} deleted", store.id);
    Ok(ApiResponse::success(store))
}
