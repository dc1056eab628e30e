use axum::extract::{rejection::QueryRejection, Extension, Path, Query, State};

use crate::database::models::{ProductDetail, ProductFilter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::ProductInput;

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

fn not_found() -> ApiError {
    ApiError::not_found("Product not found")
}

/// GET /api/:store_id/products - Storefront listing.
///
/// Accepts `categoryId`, `colorId`, `sizeId` and `isFeatured` filters.
/// Archived products are left out unless `includeArchived=true`.
pub async fn list(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    filter: Result<Query<ProductFilter>, QueryRejection>,
) -> ApiResult<Vec<ProductDetail>> {
    let store_id = parse_id("storeId", &store_id)?;
    let Query(filter) = filter.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let products = state
        .catalog
        .list_products(store_id, &filter)
        .await
        .map_err(failure("PRODUCTS_GET"))?;
    Ok(ApiResponse::success(products))
}

/// GET /api/:store_id/products/:product_id
pub async fn show(
    Path((store_id, product_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<ProductDetail> {
    let store_id = parse_id("storeId", &store_id)?;
    let product_id = parse_id("productId", &product_id)?;
    let product = state
        .catalog
        .find_product(store_id, product_id)
        .await
        .map_err(failure("PRODUCT_GET"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(product))
}

/// POST /api/:store_id/products
pub async fn create(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ApiResult<ProductDetail> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let product = state
        .catalog
        .create_product(store_id, &input)
        .await
        .map_err(failure("PRODUCTS_POST"))?;
    Ok(ApiResponse::success(product))
}

/// PATCH /api/:store_id/products/:product_id - Full replace, images included
pub async fn update(
    Path((store_id, product_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ApiResult<ProductDetail> {
    let store_id = parse_id("storeId", &store_id)?;
    let product_id = parse_id("productId", &product_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let product = state
        .catalog
        .update_product(store_id, product_id, &input)
        .await
        .map_err(failure("PRODUCT_PATCH"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/:store_id/products/:product_id
pub async fn delete(
    Path((store_id, product_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<ProductDetail> {
    let store_id = parse_id("storeId", &store_id)?;
    let product_id = parse_id("productId", &product_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let product = state
        .catalog
        .delete_product(store_id, product_id)
        .await
        .map_err(failure("PRODUCT_DELETE"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(product))
}
