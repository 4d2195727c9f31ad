use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/reviews", post(handlers::review::create_review))
        .route("/api/reviews/:id", get(handlers::review::get_review))
        .route("/api/reviews/:id", put(handlers::review::update_review))
        .route("/api/reviews/:id", delete(handlers::review::delete_review))
        .route("/api/gyms/:id/reviews", get(handlers::review::gym_reviews))
        .route("/api/users/:id/reviews", get(handlers::review::user_reviews))
}
