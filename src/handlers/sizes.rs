use axum::extract::{Extension, Path, State};

use crate::database::models::Size;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::SizeInput;

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

fn not_found() -> ApiError {
    ApiError::not_found("Size not found")
}

/// GET /api/:store_id/sizes
pub async fn list(Path(store_id): Path<String>, State(state): State<AppState>) -> ApiResult<Vec<Size>> {
    let store_id = parse_id("storeId", &store_id)?;
    let sizes = state
        .catalog
        .list_sizes(store_id)
        .await
        .map_err(failure("SIZES_GET"))?;
    Ok(ApiResponse::success(sizes))
}

/// GET /api/:store_id/sizes/:size_id
pub async fn show(Path((store_id, size_id)): Path<(String, String)>, State(state): State<AppState>) -> ApiResult<Size> {
    let store_id = parse_id("storeId", &store_id)?;
    let size_id = parse_id("sizeId", &size_id)?;
    let size = state
        .catalog
        .find_size(store_id, size_id)
        .await
        .map_err(failure("SIZE_GET"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(size))
}

/// POST /api/:store_id/sizes
pub async fn create(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<SizeInput>,
) -> ApiResult<Size> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let size = state
        .catalog
        .create_size(store_id, &input)
        .await
        .map_err(failure("SIZES_POST"))?;
    Ok(ApiResponse::success(size))
}

/// PATCH /api/:store_id/sizes/:size_id
pub async fn update(
    Path((store_id, size_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<SizeInput>,
) -> ApiResult<Size> {
    let store_id = parse_id("storeId", &store_id)?;
    let size_id = parse_id("sizeId", &size_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let size = state
        .catalog
        .update_size(store_id, size_id, &input)
        .await
        .map_err(failure("SIZE_PATCH"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(size))
}

/// DELETE /api/:store_id/sizes/:size_id
pub async fn delete(
    Path((store_id, size_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Size> {
    let store_id = parse_id("storeId", &store_id)?;
    let size_id = parse_id("sizeId", &size_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let size = state
        .catalog
        .delete_size(store_id, size_id)
        .await
        .map_err(failure("SIZE_DELETE"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(size))
}
