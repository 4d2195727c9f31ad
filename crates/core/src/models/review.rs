use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Ratings are whole stars in [1, 5]; anything else is rejected before any
/// write is attempted.
pub fn validate_rating(rating: i16) -> GymResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(GymError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub gym_id: Uuid,
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewResponse {
    pub review_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: i16,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymReviewResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub user_first_name: String,
    pub user_last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserReviewResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub gym_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListResponse<T> {
    pub count: usize,
    pub reviews: Vec<T>,
}
