use axum::{Json, extract::State};
use std::sync::Arc;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, UserProfile, UserRole},
};

use crate::{
    ApiState,
    handlers::user::user_profile,
    middleware::{auth, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    // Self-registration is limited to the two public roles
    let role: UserRole = payload.role.parse().map_err(AppError)?;
    if role == UserRole::Admin {
        return Err(AppError(GymError::Validation(
            "Invalid user role".to_string(),
        )));
    }

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
        "User registered successfully",
        user_profile(db_user)?,
    )))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    // Unknown usernames and wrong passwords are indistinguishable here
    let db_user =
        gymfinder_db::repositories::user::get_user_by_username(&state.db_pool, &payload.username)
            .await
            .map_err(GymError::Database)?
            .ok_or_else(|| GymError::Authentication("Invalid credentials".to_string()))?;

    let is_valid = auth::verify_password(&payload.password, &db_user.password_hash)?;
    if !is_valid {
        return Err(AppError(GymError::Authentication(
            "Invalid credentials".to_string(),
        )));
    }

    if !db_user.active {
        return Err(AppError(GymError::Authentication(
            "Account is disabled".to_string(),
        )));
    }

    let role: UserRole = db_user.role.parse().map_err(AppError)?;
    let token = auth::issue_token(
        &state.config.token_secret,
        state.config.token_expiry_seconds,
        db_user.id,
        &db_user.username,
        role,
    )
    .map_err(AppError)?;

    gymfinder_db::repositories::user::update_last_login(&state.db_pool, db_user.id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token,
            user: user_profile(db_user)?,
        },
    )))
}
