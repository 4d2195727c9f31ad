use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/gyms", get(handlers::gym::list_gyms))
        .route("/api/gyms", post(handlers::gym::create_gym))
        .route("/api/gyms/search", get(handlers::gym::search_gyms))
        .route("/api/gyms/mine", get(handlers::gym::my_gyms))
        .route("/api/gyms/:id", get(handlers::gym::get_gym))
        .route("/api/gyms/:id", put(handlers::gym::update_gym))
        .route("/api/gyms/:id", delete(handlers::gym::delete_gym))
        .route("/api/gyms/:id/ratings", get(handlers::gym::get_gym_ratings))
}
