use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::booking::{
        BookingListResponse, BookingResponse, BookingStatus, CreateBookingRequest,
        CreateBookingResponse, GymBookingResponse, UpdateBookingRequest,
        UpdateBookingStatusRequest, UserBookingResponse,
    },
};
use gymfinder_db::models::{DbBooking, DbGymBooking, DbUserBooking};
use gymfinder_db::repositories::booking::StatusUpdate;

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
};

fn booking_response(booking: DbBooking) -> Result<BookingResponse, AppError> {
    let status: BookingStatus = booking.status.parse().map_err(AppError)?;

    Ok(BookingResponse {
        id: booking.id,
        user_id: booking.user_id,
        gym_id: booking.gym_id,
        status,
        starts_on: booking.starts_on,
        ends_on: booking.ends_on,
        note: booking.note,
        requested_at: booking.requested_at,
        responded_at: booking.responded_at,
    })
}

fn user_booking_response(booking: DbUserBooking) -> Result<UserBookingResponse, AppError> {
    let status: BookingStatus = booking.status.parse().map_err(AppError)?;

    Ok(UserBookingResponse {
        booking: BookingResponse {
            id: booking.id,
            user_id: booking.user_id,
            gym_id: booking.gym_id,
            status,
            starts_on: booking.starts_on,
            ends_on: booking.ends_on,
            note: booking.note,
            requested_at: booking.requested_at,
            responded_at: booking.responded_at,
        },
        gym_name: booking.gym_name,
    })
}

fn gym_booking_response(booking: DbGymBooking) -> Result<GymBookingResponse, AppError> {
    let status: BookingStatus = booking.status.parse().map_err(AppError)?;

    Ok(GymBookingResponse {
        booking: BookingResponse {
            id: booking.id,
            user_id: booking.user_id,
            gym_id: booking.gym_id,
            status,
            starts_on: booking.starts_on,
            ends_on: booking.ends_on,
            note: booking.note,
            requested_at: booking.requested_at,
            responded_at: booking.responded_at,
        },
        user_first_name: booking.user_first_name,
        user_last_name: booking.user_last_name,
        user_email: booking.user_email,
    })
}

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<CreateBookingResponse>>, AppError> {
    gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, payload.gym_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", payload.gym_id)))?;

    // At most one outstanding or confirmed booking per user per gym
    let has_active = gymfinder_db::repositories::booking::has_active_booking(
        &state.db_pool,
        user.user_id(),
        payload.gym_id,
    )
    .await
    .map_err(GymError::Database)?;

    if has_active {
        return Err(AppError(GymError::Conflict(
            "You already have an active booking for this gym".to_string(),
        )));
    }

    let booking = gymfinder_db::repositories::booking::create_booking(
        &state.db_pool,
        user.user_id(),
        payload.gym_id,
        Some(payload.starts_on),
        payload.ends_on,
        payload.note.as_deref(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Booking created successfully",
        CreateBookingResponse {
            booking_id: booking.id,
        },
    )))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = gymfinder_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Booking with ID {} not found", id)))?;

    if booking.user_id != user.user_id() && !user.is_admin() {
        // The gym owner may see bookings for their gym
        let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, booking.gym_id)
            .await
            .map_err(GymError::Database)?
            .ok_or_else(|| GymError::NotFound("Gym not found".to_string()))?;

        if gym.owner_id != user.user_id() {
            return Err(AppError(GymError::Authorization(
                "Not authorized to view this booking".to_string(),
            )));
        }
    }

    Ok(Json(ApiResponse::ok(
        "Booking retrieved successfully",
        booking_response(booking)?,
    )))
}

#[axum::debug_handler]
pub async fn my_bookings(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<BookingListResponse<UserBookingResponse>>>, AppError> {
    let db_bookings =
        gymfinder_db::repositories::booking::list_bookings_by_user(&state.db_pool, user.user_id())
            .await
            .map_err(GymError::Database)?;

    let bookings = db_bookings
        .into_iter()
        .map(user_booking_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::ok(
        "Bookings retrieved successfully",
        BookingListResponse {
            count: bookings.len(),
            bookings,
        },
    )))
}

#[axum::debug_handler]
pub async fn gym_bookings(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingListResponse<GymBookingResponse>>>, AppError> {
    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", id)))?;

    if gym.owner_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to view bookings for this gym".to_string(),
        )));
    }

    let db_bookings =
        gymfinder_db::repositories::booking::list_bookings_by_gym(&state.db_pool, id)
            .await
            .map_err(GymError::Database)?;

    let bookings = db_bookings
        .into_iter()
        .map(gym_booking_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::ok(
        "Bookings retrieved successfully",
        BookingListResponse {
            count: bookings.len(),
            bookings,
        },
    )))
}

/// Decides a pending booking. The status write and, on confirmation, the
/// subscriber-count increment commit together or not at all.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let new_status: BookingStatus = payload.status.parse().map_err(AppError)?;

    let booking = gymfinder_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Booking with ID {} not found", id)))?;

    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, booking.gym_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound("Gym not found".to_string()))?;

    if gym.owner_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to decide this booking".to_string(),
        )));
    }

    let outcome =
        gymfinder_db::repositories::booking::update_booking_status(&state.db_pool, id, new_status)
            .await
            .map_err(GymError::Database)?;

    match outcome {
        StatusUpdate::Applied(updated) => Ok(Json(ApiResponse::ok(
            "Booking status updated successfully",
            booking_response(updated)?,
        ))),
        StatusUpdate::NotPending => Err(AppError(GymError::InvalidState(
            "Booking has already been decided".to_string(),
        ))),
    }
}

#[axum::debug_handler]
pub async fn update_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = gymfinder_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Booking with ID {} not found", id)))?;

    if booking.user_id != user.user_id() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to update this booking".to_string(),
        )));
    }

    let status: BookingStatus = booking.status.parse().map_err(AppError)?;
    if status.is_terminal() {
        return Err(AppError(GymError::InvalidState(
            "Cannot modify a booking that has already been decided".to_string(),
        )));
    }

    let updated = gymfinder_db::repositories::booking::update_booking(
        &state.db_pool,
        id,
        payload.starts_on,
        payload.ends_on,
        payload.note.as_deref(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Booking updated successfully",
        booking_response(updated)?,
    )))
}

#[axum::debug_handler]
pub async fn delete_booking(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let booking = gymfinder_db::repositories::booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Booking with ID {} not found", id)))?;

    if booking.user_id != user.user_id() && !user.is_admin() {
        let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, booking.gym_id)
            .await
            .map_err(GymError::Database)?
            .ok_or_else(|| GymError::NotFound("Gym not found".to_string()))?;

        if gym.owner_id != user.user_id() {
            return Err(AppError(GymError::Authorization(
                "Not authorized to delete this booking".to_string(),
            )));
        }
    }

    // No counter decrement here, even for a confirmed booking; the next
    // listing read reconciles the cached count.
    gymfinder_db::repositories::booking::delete_booking(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Booking deleted successfully",
        serde_json::json!({}),
    )))
}
