use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::review::{
        CreateReviewRequest, CreateReviewResponse, GymReviewResponse, ReviewListResponse,
        ReviewResponse, UpdateReviewRequest, UserReviewResponse, validate_rating,
    },
};
use gymfinder_db::models::{DbGymReview, DbReview, DbUserReview};

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

fn review_response(review: DbReview) -> ReviewResponse {
    ReviewResponse {
        id: review.id,
        user_id: review.user_id,
        gym_id: review.gym_id,
        rating: review.rating,
        comment: review.comment,
        created_at: review.created_at,
    }
}

fn gym_review_response(review: DbGymReview) -> GymReviewResponse {
    GymReviewResponse {
        review: ReviewResponse {
            id: review.id,
            user_id: review.user_id,
            gym_id: review.gym_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        },
        user_first_name: review.user_first_name,
        user_last_name: review.user_last_name,
    }
}

fn user_review_response(review: DbUserReview) -> UserReviewResponse {
    UserReviewResponse {
        review: ReviewResponse {
            id: review.id,
            user_id: review.user_id,
            gym_id: review.gym_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        },
        gym_name: review.gym_name,
    }
}

/// One review per user per gym: a repeat submission overwrites the
/// existing rating and comment instead of creating a duplicate.
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Json<ApiResponse<CreateReviewResponse>>, AppError> {
    validate_rating(payload.rating).map_err(AppError)?;

    gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, payload.gym_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", payload.gym_id)))?;

    let already_reviewed = gymfinder_db::repositories::review::user_has_reviewed(
        &state.db_pool,
        user.user_id(),
        payload.gym_id,
    )
    .await
    .map_err(GymError::Database)?;

    let review = gymfinder_db::repositories::review::upsert_review(
        &state.db_pool,
        user.user_id(),
        payload.gym_id,
        payload.rating,
        &payload.comment,
    )
    .await
    .map_err(GymError::Database)?;

    let message = if already_reviewed {
        "Review updated successfully"
    } else {
        "Review created successfully"
    };

    Ok(Json(ApiResponse::ok(
        message,
        CreateReviewResponse {
            review_id: review.id,
        },
    )))
}

#[axum::debug_handler]
pub async fn get_review(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewResponse>>, AppError> {
    let review = gymfinder_db::repositories::review::get_review_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Review with ID {} not found", id)))?;

    Ok(Json(ApiResponse::ok(
        "Review retrieved successfully",
        review_response(review),
    )))
}

#[axum::debug_handler]
pub async fn gym_reviews(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewListResponse<GymReviewResponse>>>, AppError> {
    let db_reviews = gymfinder_db::repositories::review::list_reviews_by_gym(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    let reviews: Vec<_> = db_reviews.into_iter().map(gym_review_response).collect();

    Ok(Json(ApiResponse::ok(
        "Reviews retrieved successfully",
        ReviewListResponse {
            count: reviews.len(),
            reviews,
        },
    )))
}

#[axum::debug_handler]
pub async fn user_reviews(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReviewListResponse<UserReviewResponse>>>, AppError> {
    if user.user_id() != id && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to view these reviews".to_string(),
        )));
    }

    let db_reviews = gymfinder_db::repositories::review::list_reviews_by_user(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    let reviews: Vec<_> = db_reviews.into_iter().map(user_review_response).collect();

    Ok(Json(ApiResponse::ok(
        "Reviews retrieved successfully",
        ReviewListResponse {
            count: reviews.len(),
            reviews,
        },
    )))
}

#[axum::debug_handler]
pub async fn update_review(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewResponse>>, AppError> {
    validate_rating(payload.rating).map_err(AppError)?;

    let review = gymfinder_db::repositories::review::get_review_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Review with ID {} not found", id)))?;

    if review.user_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to update this review".to_string(),
        )));
    }

    let updated = gymfinder_db::repositories::review::update_review(
        &state.db_pool,
        id,
        payload.rating,
        &payload.comment,
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Review updated successfully",
        review_response(updated),
    )))
}

#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let review = gymfinder_db::repositories::review::get_review_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Review with ID {} not found", id)))?;

    if review.user_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to delete this review".to_string(),
        )));
    }

    gymfinder_db::repositories::review::delete_review(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Review deleted successfully",
        serde_json::json!({}),
    )))
}
