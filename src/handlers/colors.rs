use axum::extract::{Extension, Path, State};

use crate::database::models::Color;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Session};
use crate::state::AppState;
use crate::validation::ColorInput;

use super::utils::{failure, owned_store, parse_id, ValidatedJson};

fn not_found() -> ApiError {
    ApiError::not_found("Color not found")
}

/// GET /api/:store_id/colors
pub async fn list(Path(store_id): Path<String>, State(state): State<AppState>) -> ApiResult<Vec<Color>> {
    let store_id = parse_id("storeId", &store_id)?;
    let colors = state
        .catalog
        .list_colors(store_id)
        .await
        .map_err(failure("COLORS_GET"))?;
    Ok(ApiResponse::success(colors))
}

/// GET /api/:store_id/colors/:color_id
pub async fn show(
    Path((store_id, color_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<Color> {
    let store_id = parse_id("storeId", &store_id)?;
    let color_id = parse_id("colorId", &color_id)?;
    let color = state
        .catalog
        .find_color(store_id, color_id)
        .await
        .map_err(failure("COLOR_GET"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(color))
}

/// POST /api/:store_id/colors
pub async fn create(
    Path(store_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<ColorInput>,
) -> ApiResult<Color> {
    let store_id = parse_id("storeId", &store_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let color = state
        .catalog
        .create_color(store_id, &input)
        .await
        .map_err(failure("COLORS_POST"))?;
    Ok(ApiResponse::success(color))
}

/// PATCH /api/:store_id/colors/:color_id
pub async fn update(
    Path((store_id, color_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(input): ValidatedJson<ColorInput>,
) -> ApiResult<Color> {
    let store_id = parse_id("storeId", &store_id)?;
    let color_id = parse_id("colorId", &color_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let color = state
        .catalog
        .update_color(store_id, color_id, &input)
        .await
        .map_err(failure("COLOR_PATCH"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(color))
}

/// DELETE /api/:store_id/colors/:color_id - Refused while products use it
pub async fn delete(
    Path((store_id, color_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Color> {
    let store_id = parse_id("storeId", &store_id)?;
    let color_id = parse_id("colorId", &color_id)?;
    let user = session.require()?;
    owned_store(&state, store_id, user).await?;

    let color = state
        .catalog
        .delete_color(store_id, color_id)
        .await
        .map_err(failure("COLOR_DELETE"))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(color))
}
