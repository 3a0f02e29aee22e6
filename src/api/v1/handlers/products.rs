/*
 * Responsibility
 * - /products CRUD handlers, count and featured listing
 * - category references are resolved here (populate on read, existence check on write)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::{
            categories::CategoryResponse,
            products::{ProductListQuery, ProductRequest, ProductResponse},
        },
        extractors::{ObjectId, parse_object_id},
    },
    error::AppError,
    repos::{Store, category_repo, product_repo},
    state::AppState,
};

fn to_response(store: &Store, row: product_repo::ProductDoc) -> Result<ProductResponse, AppError> {
    let category = category_repo::get(store, row.fields.category_id)?.map(CategoryResponse::from);
    Ok(ProductResponse::new(row, category))
}

fn to_responses(
    store: &Store,
    rows: Vec<product_repo::ProductDoc>,
) -> Result<Vec<ProductResponse>, AppError> {
    rows.into_iter().map(|row| to_response(store, row)).collect()
}

fn existing_category(store: &Store, raw: &str) -> Result<Uuid, AppError> {
    let invalid = || AppError::validation("INVALID_CATEGORY", "invalid category");
    let id = parse_object_id(raw).map_err(|_| invalid())?;
    category_repo::get(store, id)?.ok_or_else(invalid)?;
    Ok(id)
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let filter = query
        .categories
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .filter(|s| !s.trim().is_empty())
                .map(parse_object_id)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let rows = product_repo::list(&state.store, filter.as_deref())?;
    Ok(Json(to_responses(&state.store, rows)?))
}

pub async fn get_product(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.store, id)?.ok_or(AppError::not_found("product"))?;
    Ok(Json(to_response(&state.store, row)?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;
    let category_id = existing_category(&state.store, &req.category)?;

    let row = product_repo::create(&state.store, req.into_fields(category_id))?;
    Ok((StatusCode::CREATED, Json(to_response(&state.store, row)?)))
}

pub async fn update_product(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;
    let category_id = existing_category(&state.store, &req.category)?;

    let row = product_repo::update(&state.store, id, req.into_fields(category_id))?
        .ok_or(AppError::not_found("product"))?;
    Ok(Json(to_response(&state.store, row)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
) -> Result<StatusCode, AppError> {
    if product_repo::delete(&state.store, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}

pub async fn count_products(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = product_repo::count(&state.store)?;
    Ok(Json(json!({ "productCount": count })))
}

pub async fn featured_products(
    State(state): State<AppState>,
    Path(count): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let limit: usize = count.trim().parse().map_err(|_| {
        AppError::validation("INVALID_COUNT", "count must be a non-negative integer")
    })?;

    let rows = product_repo::featured(&state.store, limit)?;
    Ok(Json(to_responses(&state.store, rows)?))
}
