use axum::extract::{Extension, Path, State};

use crate::database::models::{Category, CategoryDetail};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::CategoryInput;

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

fn not_found() -> ApiError {
    ApiError::not_found("Category not found")
}

/// GET /api/:store_id/categories - Each category carries its billboard
pub async fn list(Path(store_id): Path<String>, State(state): State<AppState>) -> ApiResult<Vec<CategoryDetail>> {
    let store_id = parse_id("storeId", &store_id)?;
    let categories = state
        .catalog
        .list_categories(store_id)
        .await
        .map_err(failure("CATEGORIES_GET"))?;
    Ok(ApiResponse::success(categories))
}

/// GET /api/:store_id/categories/:category_id
pub async fn show(
    Path((store_id, category_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<CategoryDetail> {
    let store_id = parse_id("storeId", &store_id)?;
    let category_id = parse_id("categoryId", &category_id)?;
    let category = state
        .catalog
        .find_category(store_id, category_id)
        .await
        .map_err(failure("CATEGORY_GET"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(category))
}

/// POST /api/:store_id/categories
pub async fn create(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> ApiResult<Category> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let category = state
        .catalog
        .create_category(store_id, &input)
        .await
        .map_err(failure("CATEGORIES_POST"))?;
    Ok(ApiResponse::success(category))
}

/// PATCH /api/:store_id/categories/:category_id
pub async fn update(
    Path((store_id, category_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> ApiResult<Category> {
    let store_id = parse_id("storeId", &store_id)?;
    let category_id = parse_id("categoryId", &category_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let category = state
        .catalog
        .update_category(store_id, category_id, &input)
        .await
        .map_err(failure("CATEGORY_PATCH"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/:store_id/categories/:category_id
pub async fn delete(
    Path((store_id, category_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Category> {
    let store_id = parse_id("storeId", &store_id)?;
    let category_id = parse_id("categoryId", &category_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let category = state
        .catalog
        .delete_category(store_id, category_id)
        .await
        .map_err(failure("CATEGORY_DELETE"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(category))
}
