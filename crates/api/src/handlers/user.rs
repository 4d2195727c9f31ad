use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::user::{
        ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserProfile, UserRole,
    },
};
use gymfinder_db::models::DbUser;

use crate::{
    ApiState,
    middleware::{auth, auth::AuthUser, error_handling::AppError},
};

/// Maps a database row to the client-facing profile, dropping the hash.
pub(crate) fn user_profile(user: DbUser) -> Result<UserProfile, AppError> {
    let role: UserRole = user.role.parse().map_err(AppError)?;

    Ok(UserProfile {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role,
        active: user.active,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
    })
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let db_user = gymfinder_db::repositories::user::get_user_by_id(&state.db_pool, user.user_id())
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound("User not found".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "User retrieved successfully",
        user_profile(db_user)?,
    )))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    if user.user_id() != id && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to view this user".to_string(),
        )));
    }

    let db_user = gymfinder_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(ApiResponse::ok(
        "User retrieved successfully",
        user_profile(db_user)?,
    )))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, AppError> {
    if !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to list users".to_string(),
        )));
    }

    let db_users = gymfinder_db::repositories::user::list_users(&state.db_pool)
        .await
        .map_err(GymError::Database)?;

    let profiles = db_users
        .into_iter()
        .map(user_profile)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::ok(
        "Users retrieved successfully",
        profiles,
    )))
}

/// Admin-side creation; unlike registration this accepts any role.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    if !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to create users".to_string(),
        )));
    }

    let role: UserRole = payload.role.parse().map_err(AppError)?;

    if gymfinder_db::repositories::user::username_exists(&state.db_pool, &payload.username)
        .await
        .map_err(GymError::Database)?
    {
        return Err(AppError(GymError::Conflict(
            "Username already in use".to_string(),
        )));
    }

    if gymfinder_db::repositories::user::email_exists(&state.db_pool, &payload.email)
        .await
        .map_err(GymError::Database)?
    {
        return Err(AppError(GymError::Conflict(
            "Email already in use".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let db_user = gymfinder_db::repositories::user::create_user(
        &state.db_pool,
        &payload.username,
        &payload.email,
        &password_hash,
        &payload.first_name,
        &payload.last_name,
        role.as_str(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "User created successfully",
        user_profile(db_user)?,
    )))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    if user.user_id() != id && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to update this user".to_string(),
        )));
    }

    gymfinder_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("User with ID {} not found", id)))?;

    // Roles only move by admin action
    if payload.role.is_some() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Only an administrator can change roles".to_string(),
        )));
    }

    if let Some(role) = &payload.role {
        role.parse::<UserRole>().map_err(AppError)?;
    }

    let db_user = gymfinder_db::repositories::user::update_user(
        &state.db_pool,
        id,
        payload.email.as_deref(),
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        payload.role.as_deref(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "User updated successfully",
        user_profile(db_user)?,
    )))
}

#[axum::debug_handler]
pub async fn change_password(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    if user.user_id() != id && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to change this password".to_string(),
        )));
    }

    gymfinder_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("User with ID {} not found", id)))?;

    let is_valid = gymfinder_db::repositories::user::verify_password(
        &state.db_pool,
        id,
        &payload.current_password,
    )
    .await
    .map_err(GymError::Database)?;

    if !is_valid {
        return Err(AppError(GymError::Authentication(
            "Current password is incorrect".to_string(),
        )));
    }

    let password_hash = auth::hash_password(&payload.new_password)?;
    gymfinder_db::repositories::user::update_password(&state.db_pool, id, &password_hash)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Password updated successfully",
        serde_json::json!({}),
    )))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    if user.user_id() != id && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to delete this user".to_string(),
        )));
    }

    gymfinder_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("User with ID {} not found", id)))?;

    gymfinder_db::repositories::user::delete_user(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "User deleted successfully",
        serde_json::json!({}),
    )))
}
