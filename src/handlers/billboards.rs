use axum::extract::{Extension, Path, State};

use crate::database::models::Billboard;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::BillboardInput;

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

fn not_found() -> ApiError {
    ApiError::not_found("Billboard not found")
}

/// GET /api/:store_id/billboards
pub async fn list(Path(store_id): Path<String>, State(state): State<AppState>) -> ApiResult<Vec<Billboard>> {
    let store_id = parse_id("storeId", &store_id)?;
    let billboards = state
        .catalog
        .list_billboards(store_id)
        .await
        .map_err(failure("BILLBOARDS_GET"))?;
    Ok(ApiResponse::success(billboards))
}

/// GET /api/:store_id/billboards/:billboard_id
pub async fn show(
    Path((store_id, billboard_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<Billboard> {
    let store_id = parse_id("storeId", &store_id)?;
    let billboard_id = parse_id("billboardId", &billboard_id)?;
    let billboard = state
        .catalog
        .find_billboard(store_id, billboard_id)
        .await
        .map_err(failure("BILLBOARD_GET"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(billboard))
}

/// POST /api/:store_id/billboards
pub async fn create(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<BillboardInput>,
) -> ApiResult<Billboard> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let billboard = state
        .catalog
        .create_billboard(store_id, &input)
        .await
        .map_err(failure("BILLBOARDS_POST"))?;
    Ok(ApiResponse::success(billboard))
}

/// PATCH /api/:store_id/billboards/:billboard_id
pub async fn update(
    Path((store_id, billboard_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<BillboardInput>,
) -> ApiResult<Billboard> {
    let store_id = parse_id("storeId", &store_id)?;
    let billboard_id = parse_id("billboardId", &billboard_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let billboard = state
        .catalog
        .update_billboard(store_id, billboard_id, &input)
        .await
        .map_err(failure("BILLBOARD_PATCH"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(billboard))
}

/// DELETE /api/:store_id/billboards/:billboard_id - Refused while categories use it
pub async fn delete(
    Path((store_id, billboard_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Billboard> {
    let store_id = parse_id("storeId", &store_id)?;
    let billboard_id = parse_id("billboardId", &billboard_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let billboard = state
        .catalog
        .delete_billboard(store_id, billboard_id)
        .await
        .map_err(failure("BILLBOARD_DELETE"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(billboard))
}
