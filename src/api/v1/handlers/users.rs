/*
 * Responsibility
 * - /users CRUD handlers, login and register
 * - ownership: non-admins may only read/update themselves; only admins grant isAdmin
 */
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    api::v1::{
        dto::users::{
            CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest, UserResponse,
        },
        extractors::{AuthCtxExtractor, ObjectId},
    },
    error::AppError,
    repos::user_repo,
    services::auth::password::{hash_password, verify_password},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.store)?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ObjectId(user_id): ObjectId,
) -> Result<Json<UserResponse>, AppError> {
    ctx.ensure_self_or_admin(&user_id.to_string())?;

    let row = user_repo::get(&state.store, user_id)?.ok_or(AppError::not_found("user"))?;
    Ok(Json(row.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let row = user_repo::create(
        &state.store,
        req.fields(req.is_admin),
        hash_password(&req.password)?,
    )?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    if req.is_admin {
        tracing::warn!(email = %req.email, "ignoring isAdmin on self-registration");
    }

    let row = user_repo::create(&state.store, req.fields(false), hash_password(&req.password)?)?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ObjectId(user_id): ObjectId,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    ctx.ensure_self_or_admin(&user_id.to_string())?;
    req.validate()
        .map_err(|m| AppError::validation("INVALID_BODY", m))?;

    let current = user_repo::get(&state.store, user_id)?.ok_or(AppError::not_found("user"))?;

    let is_admin = match req.is_admin {
        Some(requested) if requested != current.fields.is_admin => {
            if !ctx.is_admin {
                return Err(AppError::InsufficientPrivilege);
            }
            requested
        }
        _ => current.fields.is_admin,
    };

    let password_hash = req.password.as_deref().map(hash_password).transpose()?;

    let row = user_repo::update(&state.store, user_id, req.fields(is_admin), password_hash)?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ObjectId(user_id): ObjectId,
) -> Result<StatusCode, AppError> {
    if user_repo::delete(&state.store, user_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Same message for unknown email and wrong password.
    let rejected = || AppError::validation("INVALID_LOGIN", "invalid email or password");

    let user = user_repo::find_by_email(&state.store, req.email.trim())?.ok_or_else(rejected)?;
    if !verify_password(&req.password, &user.password_hash) {
        tracing::info!(user_id = %user.id, "login rejected: wrong password");
        return Err(rejected());
    }

    let token = state
        .tokens
        .issue(&user.id.to_string(), user.fields.is_admin, Utc::now())?;

    Ok(Json(LoginResponse {
        user: user.fields.email,
        token,
    }))
}

pub async fn count_users(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let count = user_repo::count(&state.store)?;
    Ok(Json(json!({ "userCount": count })))
}
