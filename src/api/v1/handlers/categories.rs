/*
 * Responsibility
 * - /categories CRUD handlers
 * - admission (public read, admin write) is decided by the gate before these run
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::categories::{CategoryRequest, CategoryResponse},
        extractors::ObjectId,
    },
    error::AppError,
    repos::category_repo,
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category_repo::list(&state.store)?;
    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn get_category(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
) -> Result<Json<CategoryResponse>, AppError> {
    let row = category_repo::get(&state.store, id)?.ok_or(AppError::not_found("category"))?;
    Ok(Json(row.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let row = category_repo::create(
        &state.store,
        req.name.trim(),
        req.icon.as_deref(),
        req.color.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let row = category_repo::update(
        &state.store,
        id,
        req.name.trim(),
        req.icon.as_deref(),
        req.color.as_deref(),
    )?
    .ok_or(AppError::not_found("category"))?;

    Ok(Json(row.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
) -> Result<StatusCode, AppError> {
    if category_repo::delete(&state.store, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("category"))
    }
}
