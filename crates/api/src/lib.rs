//! # GymFinder API
//!
//! The API crate provides the web server implementation for the GymFinder
//! marketplace. Gym owners list their facilities; customers search them,
//! request bookings, and leave reviews.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Storage**: Keep uploaded image files on disk, outside the routed paths
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Filesystem store for uploaded images
pub mod storage;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use storage::FileStore;

/// Shared application state that is accessible to all request handlers.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Application configuration
    pub config: config::ApiConfig,
    /// Store for uploaded image files
    pub files: FileStore,
}

/// Starts the API server with the provided configuration and database
/// connection.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let files = FileStore::new(config.upload_dir.clone());
    let max_upload_bytes = config.max_upload_bytes;
    let cors_origins = config.cors_origins.clone();
    let request_timeout = config.request_timeout;
    let addr = config.server_addr();

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        config,
        files,
    });

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Registration and login
        .merge(routes::auth::routes())
        // User management endpoints
        .merge(routes::user::routes())
        // Gym registry endpoints
        .merge(routes::gym::routes())
        // Booking workflow endpoints
        .merge(routes::booking::routes())
        // Review endpoints
        .merge(routes::review::routes())
        // Gym image endpoints
        .merge(routes::image::routes())
        // Uploads may exceed axum's default body cap
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .map(|origin| origin.parse().unwrap())
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(request_timeout),
    ));

    // Start the HTTP server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
