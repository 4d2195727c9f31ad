use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::{
    envelope::ApiResponse,
    errors::GymError,
    models::image::{ImageListResponse, ImageResponse, UpdateImageRequest, UploadImageResponse},
};
use gymfinder_db::models::{DbGym, DbGymImage};

use crate::{
    ApiState,
    middleware::{auth::AuthUser, error_handling::AppError},
    storage,
};

fn image_response(image: DbGymImage) -> ImageResponse {
    ImageResponse {
        id: image.id,
        gym_id: image.gym_id,
        file_path: image.file_path,
        description: image.description,
        is_main: image.is_main,
        uploaded_at: image.uploaded_at,
    }
}

async fn load_gym(state: &ApiState, gym_id: Uuid) -> Result<DbGym, AppError> {
    let gym = gymfinder_db::repositories::gym::get_gym_by_id(&state.db_pool, gym_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Gym with ID {} not found", gym_id)))?;

    Ok(gym)
}

fn require_gym_authority(user: &AuthUser, gym: &DbGym) -> Result<(), AppError> {
    if gym.owner_id != user.user_id() && !user.is_admin() {
        return Err(AppError(GymError::Authorization(
            "Not authorized to manage images for this gym".to_string(),
        )));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn get_image(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ImageResponse>>, AppError> {
    let image = gymfinder_db::repositories::gym_image::get_image_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Image with ID {} not found", id)))?;

    Ok(Json(ApiResponse::ok(
        "Image retrieved successfully",
        image_response(image),
    )))
}

#[axum::debug_handler]
pub async fn gym_images(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ImageListResponse>>, AppError> {
    let db_images = gymfinder_db::repositories::gym_image::list_images_by_gym(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    let images: Vec<_> = db_images.into_iter().map(image_response).collect();

    Ok(Json(ApiResponse::ok(
        "Images retrieved successfully",
        ImageListResponse {
            count: images.len(),
            images,
        },
    )))
}

#[axum::debug_handler]
pub async fn main_image(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ImageResponse>>, AppError> {
    let image = gymfinder_db::repositories::gym_image::get_main_image(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound("This gym has no main image".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "Image retrieved successfully",
        image_response(image),
    )))
}

/// Multipart upload: an `image` file part plus optional `description` and
/// `is_main` fields. The file lands on disk first; if the database insert
/// then fails, the orphaned file is removed best-effort.
#[axum::debug_handler]
pub async fn upload_image(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadImageResponse>>, AppError> {
    let gym = load_gym(&state, id).await?;
    require_gym_authority(&user, &gym)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description: Option<String> = None;
    let mut is_main = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| GymError::Validation("Malformed multipart body".to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("image") => {
                let original = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| GymError::Validation("Image filename missing".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| GymError::Validation("Failed to read uploaded file".to_string()))?;
                file = Some((original, data.to_vec()));
            }
            Some("description") => {
                description = Some(field.text().await.map_err(|_| {
                    GymError::Validation("Failed to read description field".to_string())
                })?);
            }
            Some("is_main") => {
                let value = field.text().await.map_err(|_| {
                    GymError::Validation("Failed to read is_main field".to_string())
                })?;
                is_main = value == "true";
            }
            _ => {}
        }
    }

    let (original, data) = file
        .ok_or_else(|| GymError::Validation("No file uploaded".to_string()))?;

    if data.len() > state.config.max_upload_bytes {
        return Err(AppError(GymError::Validation(format!(
            "File is too large (max {} MB)",
            state.config.max_upload_bytes / 1024 / 1024
        ))));
    }

    let allowed = &state.config.allowed_image_extensions;
    match storage::extension(&original) {
        Some(ext) if allowed.contains(&ext) => {}
        _ => {
            return Err(AppError(GymError::Validation(format!(
                "Extension not allowed. Allowed extensions: {}",
                allowed.join(", ")
            ))));
        }
    }

    let stored_name = storage::unique_filename(&original);
    let file_path = state
        .files
        .save(&data, &stored_name)
        .await
        .map_err(GymError::Database)?;

    let inserted = gymfinder_db::repositories::gym_image::create_image(
        &state.db_pool,
        id,
        &file_path,
        description.as_deref(),
        is_main,
    )
    .await;

    match inserted {
        Ok(image) => Ok(Json(ApiResponse::ok(
            "Image uploaded successfully",
            UploadImageResponse { image_id: image.id },
        ))),
        Err(err) => {
            // Compensating cleanup; its own failure is not reported
            let _ = state.files.delete(&file_path).await;
            Err(AppError(GymError::Database(err)))
        }
    }
}

/// Flips the main flag to the given image in one atomic update, so the gym
/// never has two main images, or none while one is set.
#[axum::debug_handler]
pub async fn set_main_image(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path((id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let gym = load_gym(&state, id).await?;
    require_gym_authority(&user, &gym)?;

    let image = gymfinder_db::repositories::gym_image::get_image_by_id(&state.db_pool, image_id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Image with ID {} not found", image_id)))?;

    if image.gym_id != id {
        return Err(AppError(GymError::Validation(
            "Image does not belong to this gym".to_string(),
        )));
    }

    gymfinder_db::repositories::gym_image::set_main_image(&state.db_pool, id, image_id)
        .await
        .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Main image set successfully",
        serde_json::json!({}),
    )))
}

#[axum::debug_handler]
pub async fn update_image(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateImageRequest>,
) -> Result<Json<ApiResponse<ImageResponse>>, AppError> {
    let image = gymfinder_db::repositories::gym_image::get_image_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Image with ID {} not found", id)))?;

    let gym = load_gym(&state, image.gym_id).await?;
    require_gym_authority(&user, &gym)?;

    let updated = gymfinder_db::repositories::gym_image::update_image(
        &state.db_pool,
        id,
        payload.description.as_deref(),
    )
    .await
    .map_err(GymError::Database)?;

    Ok(Json(ApiResponse::ok(
        "Image updated successfully",
        image_response(updated),
    )))
}

#[axum::debug_handler]
pub async fn delete_image(
    State(state): State<Arc<ApiState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let image = gymfinder_db::repositories::gym_image::get_image_by_id(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?
        .ok_or_else(|| GymError::NotFound(format!("Image with ID {} not found", id)))?;

    let gym = load_gym(&state, image.gym_id).await?;
    require_gym_authority(&user, &gym)?;

    gymfinder_db::repositories::gym_image::delete_image(&state.db_pool, id)
        .await
        .map_err(GymError::Database)?;

    // Best-effort file removal after the row is gone
    let _ = state.files.delete(&image.file_path).await;

    Ok(Json(ApiResponse::ok(
        "Image deleted successfully",
        serde_json::json!({}),
    )))
}
