use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/images/:id", get(handlers::image::get_image))
        .route("/api/images/:id", put(handlers::image::update_image))
        .route("/api/images/:id", delete(handlers::image::delete_image))
        .route("/api/gyms/:id/images", get(handlers::image::gym_images))
        .route("/api/gyms/:id/images", post(handlers::image::upload_image))
        .route(
            "/api/gyms/:id/images/main",
            get(handlers::image::main_image),
        )
        .route(
            "/api/gyms/:id/images/:image_id/main",
            post(handlers::image::set_main_image),
        )
}
