//! HTTP handlers for user account management

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::user::{CreateUserInput, UpdateUserInput, User};
use crate::services::UserService;
use crate::AppState;

/// Create a user account
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.create(input).await?;
    Ok(Json(user))
}

/// List user accounts
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.db);
    let users = service.list().await?;
    Ok(Json(users))
}

/// Get a user account
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get_by_id(user_id).await?;
    Ok(Json(user))
}

/// Update a user account
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.update(user_id, input).await?;
    Ok(Json(user))
}

/// Soft-delete a user account
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.delete(user_id).await?;
    Ok(Json(user))
}
