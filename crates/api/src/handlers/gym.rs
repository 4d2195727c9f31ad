use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::{
        gym::{
            CreateGymRequest, GymListResponse, GymListingResponse, GymResponse, GymSearchResponse,
            RatingsResponse, UpdateGymRequest, parse_opening_hour, round_rating,
        },
        user::UserRole,
    },
};
use gymfinder_db::models::{DbGym, DbGymListing, DbGymSearchHit};

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

pub(crate) fn gym_response(gym: DbGym) -> GymResponse {
    GymResponse {
        id: gym.id,
        owner_id: gym.owner_id,
        name: gym.name,
        address: gym.address,
        city: gym.city,
        postal_code: gym.postal_code,
        phone: gym.phone,
        email: gym.email,
        description: gym.description,
        monthly_price: gym.monthly_price,
        opens_at: gym.opens_at,
        closes_at: gym.closes_at,
        open_days: gym.open_days,
        subscriber_count: gym.subscriber_count,
        created_at: gym.created_at,
        updated_at: gym.updated_at,
    }
}

fn listing_response(listing: DbGymListing) -> GymListingResponse {
    GymListingResponse {
        gym: GymResponse {
            id: listing.id,
            owner_id: listing.owner_id,
            name: listing.name,
            address: listing.address,
            city: listing.city,
            postal_code: listing.postal_code,
            phone: listing.phone,
            email: listing.email,
            description: listing.description,
            monthly_price: listing.monthly_price,
            opens_at: listing.opens_at,
            closes_at: listing.closes_at,
            open_days: listing.open_days,
            subscriber_count: listing.subscriber_count,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        },
        average_rating: round_rating(listing.average_rating),
        review_count: listing.review_count,
    }
}

fn search_response(hit: DbGymSearchHit) -> GymSearchResponse {
    GymSearchResponse {
        gym: GymResponse {
            id: hit.id,
            owner_id: hit.owner_id,
            name: hit.name,
            address: hit.address,
            city: hit.city,
            postal_code: hit.postal_code,
            phone: hit.phone,
            email: hit.email,
            description: hit.description,
            monthly_price: hit.monthly_price,
            opens_at: hit.opens_at,
            closes_at: hit.closes_at,
            open_days: hit.open_days,
            subscriber_count: hit.subscriber_count,
            created_at: hit.created_at,
            updated_at: hit.updated_at,
        },
        average_rating: round_rating(hit.average_rating),
        review_count: hit.review_count,
        main_image: hit.main_image,
    }
}

/// Checks that the actor may list gyms under their own account.
fn require_gym_owner(user: &AuthUser) -> Result<(), AppError> {
    if user.0.role != UserRole::GymOwner && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Only gym owners can manage gyms".to_string(),
        )));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn list_gyms(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ApiResponse<GymListResponse<GymListingResponse>>>, AppError> {
    let listings = gymfinder_db::repositories::gym::list_gyms(&state.db_pool)
        .await
        .map_err(GymError::Database)?;

    let gyms: Vec<_> = listings.into_iter().map(listing_response).collect();

    Ok(Json(ApiResponse::ok(
        "Gyms retrieved successfully",
        GymListResponse {
            count: gyms.len(),
            gyms,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub city: String,
}

#[axum::debug_handler]
pub async fn search_gyms(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<GymListResponse<GymSearchResponse>>>, AppError> {
    if query.city.trim().is_empty() {
        return Err(AppError(GymError::Validation(
            "City must not be empty".to_string(),
        )));
    }

    let hits = gymfinder_db::repositories::gym::search_gyms_by_city(&state.db_pool, &query.city)
        .await
        .map_err(GymError::Database)?;

    let gyms: Vec<_> = hits.into_iter().map(search_response).collect();

    Ok(Json(ApiResponse::ok(
        "Gyms retrieved successfully",
        GymListResponse {
            count: gyms.len(),
            gyms,
        },
    )))
}

#[axum::debug_handler]
pub async fn my_gyms(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<GymListResponse<GymListingResponse>>>, AppError> {
    require_gym_owner(&user)?;

    let listings =
        gymfinder_db::repositories::gym::list_gyms_by_owner(&state.db_pool, user.user_id())
            .await
            .map_err(GymError::Database)?;

    let gyms: Vec<_> = listings.into_iter().map(listing_response).collect();

    Ok(Json(ApiResponse::ok(
        "Gyms retrieved successfully",
        GymListResponse {
            count: gyms.len(),
            gyms,
        },
    )))
}

#[axum::debug_handler]
pub async fn get_gym(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GymResponse>>, AppError> {
    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", id)))?;

    Ok(Json(ApiResponse::ok(
        "Gym retrieved successfully",
        gym_response(gym),
    )))
}

#[axum::debug_handler]
pub async fn get_gym_ratings(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RatingsResponse>>, AppError> {
    gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", id)))?;

    let ratings = gymfinder_db::repositories::gym::get_gym_ratings(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Ratings retrieved successfully",
        RatingsResponse::from_parts(ratings.average_rating, ratings.review_count),
    )))
}

#[axum::debug_handler]
pub async fn create_gym(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateGymRequest>,
) -> Result<Json<ApiResponse<GymResponse>>, AppError> {
    require_gym_owner(&user)?;

    let opens_at = parse_opening_hour(&payload.opens_at).map_err(AppError)?;
    let closes_at = parse_opening_hour(&payload.closes_at).map_err(AppError)?;

    let gym = gymfinder_db::repositories::gym::create_gym(
        &state.db_pool,
        user.user_id(),
        &payload.name,
        &payload.address,
        &payload.city,
        payload.postal_code.as_deref(),
        payload.phone.as_deref(),
        payload.email.as_deref(),
        payload.description.as_deref(),
        payload.monthly_price,
        opens_at,
        closes_at,
        &payload.open_days,
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Gym created successfully",
        gym_response(gym),
    )))
}

#[axum::debug_handler]
pub async fn update_gym(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGymRequest>,
) -> Result<Json<ApiResponse<GymResponse>>, AppError> {
    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", id)))?;

    if gym.owner_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to update this gym".to_string(),
        )));
    }

    let opens_at = payload
        .opens_at
        .as_deref()
        .map(parse_opening_hour)
        .transpose()
        .map_err(AppError)?;
    let closes_at = payload
        .closes_at
        .as_deref()
        .map(parse_opening_hour)
        .transpose()
        .map_err(AppError)?;

    let updated = gymfinder_db::repositories::gym::update_gym(
        &state.db_pool,
        id,
        payload.name.as_deref(),
        payload.address.as_deref(),
        payload.city.as_deref(),
        payload.postal_code.as_deref(),
        payload.phone.as_deref(),
        payload.email.as_deref(),
        payload.description.as_deref(),
        payload.monthly_price,
        opens_at,
        closes_at,
        payload.open_days.as_deref(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Gym updated successfully",
        gym_response(updated),
    )))
}

#[axum::debug_handler]
pub async fn delete_gym(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", id)))?;

    if gym.owner_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to delete this gym".to_string(),
        )));
    }

    gymfinder_db::repositories::gym::delete_gym(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Gym deleted successfully",
        serde_json::json!({}),
    )))
}
