use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/mine", get(handlers::booking::my_bookings))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route("/api/bookings/:id", put(handlers::booking::update_booking))
        .route(
            "/api/bookings/:id",
            delete(handlers::booking::delete_booking),
        )
        .route(
            "/api/bookings/:id/status",
            put(handlers::booking::update_booking_status),
        )
        .route(
            "/api/gyms/:id/bookings",
            get(handlers::booking::gym_bookings),
        )
}
