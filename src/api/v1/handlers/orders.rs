/*
 * Responsibility
 * - /orders handlers
 * - the order owner is always the caller's subject, never a body field
 * - total price is computed from current product prices
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::orders::{CreateOrderRequest, OrderResponse, UpdateOrderRequest},
        extractors::{AuthCtxExtractor, ObjectId, parse_object_id},
    },
    error::AppError,
    repos::{
        order_repo::{self, OrderDoc, OrderItemDoc},
        product_repo,
    },
    state::AppState,
};

pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let rows = order_repo::list(&state.store)?;
    Ok(Json(rows.into_iter().map(OrderResponse::from).collect()))
}

pub async fn get_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ObjectId(id): ObjectId,
) -> Result<Json<OrderResponse>, AppError> {
    let row = order_repo::get(&state.store, id)?.ok_or(AppError::not_found("order"))?;
    ctx.ensure_self_or_admin(&row.user_id)?;
    Ok(Json(row.into()))
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let user_id = ctx.subject()?.to_string();
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let mut items = Vec::with_capacity(req.order_items.len());
    let mut total_price = 0.0;
    for (index, item) in req.order_items.iter().enumerate() {
        let invalid = || {
            AppError::validation_with(
                "INVALID_PRODUCT",
                "invalid product",
                json!({ "orderItem": index }),
            )
        };
        let product_id = parse_object_id(&item.product).map_err(|_| invalid())?;
        let product = product_repo::get(&state.store, product_id)?.ok_or_else(invalid)?;

        total_price += product.fields.price * f64::from(item.quantity);
        items.push(OrderItemDoc {
            product_id,
            quantity: item.quantity,
        });
    }

    let row = order_repo::create(
        &state.store,
        OrderDoc {
            id: Uuid::new_v4(),
            user_id,
            items,
            shipping_address1: req.shipping_address1,
            shipping_address2: req.shipping_address2,
            city: req.city,
            zip: req.zip,
            country: req.country,
            phone: req.phone,
            status: "Pending".to_string(),
            total_price,
            date_ordered: Utc::now(),
        },
    )?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_order(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let row = order_repo::update_status(&state.store, id, req.status.trim())?
        .ok_or(AppError::not_found("order"))?;
    Ok(Json(row.into()))
}

pub async fn delete_order(
    State(state): State<AppState>,
    ObjectId(id): ObjectId,
) -> Result<StatusCode, AppError> {
    if order_repo::delete(&state.store, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("order"))
    }
}

pub async fn count_orders(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = order_repo::count(&state.store)?;
    Ok(Json(json!({ "orderCount": count })))
}

pub async fn total_sales(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let total = order_repo::total_sales(&state.store)?;
    Ok(Json(json!({ "totalsales": total })))
}

pub async fn user_orders(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ObjectId(user_id): ObjectId,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let user_id = user_id.to_string();
    ctx.ensure_self_or_admin(&user_id)?;

    let rows = order_repo::list_for_user(&state.store, &user_id)?;
    Ok(Json(rows.into_iter().map(OrderResponse::from).collect()))
}
