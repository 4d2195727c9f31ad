use crate::models::DbGymImage;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const IMAGE_COLUMNS: &str = "id, gym_id, file_path, description, is_main, uploaded_at";

/// Inserts an image row. When `is_main` is set the other main flags for the
/// gym are cleared in the same transaction, keeping the at-most-one-main
/// invariant without a visible intermediate state.
pub async fn create_image(
    pool: &Pool<Postgres>,
    gym_id: Uuid,
    file_path: &str,
    description: Option<&str>,
    is_main: bool,
) -> Result<DbGymImage> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    if is_main {
        sqlx::query(
            r#"
            UPDATE gym_images SET is_main = FALSE WHERE gym_id = $1
            "#,
        )
        .bind(gym_id)
        .execute(&mut *tx)
        .await?;
    }

    let image = sqlx::query_as::<_, DbGymImage>(&format!(
        r#"
        INSERT INTO gym_images (id, gym_id, file_path, description, is_main, uploaded_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {IMAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(gym_id)
    .bind(file_path)
    .bind(description)
    .bind(is_main)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(image)
}

pub async fn get_image_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbGymImage>> {
    let image = sqlx::query_as::<_, DbGymImage>(&format!(
        r#"
        SELECT {IMAGE_COLUMNS}
        FROM gym_images
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

pub async fn list_images_by_gym(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<Vec<DbGymImage>> {
    let images = sqlx::query_as::<_, DbGymImage>(&format!(
        r#"
        SELECT {IMAGE_COLUMNS}
        FROM gym_images
        WHERE gym_id = $1
        ORDER BY is_main DESC, uploaded_at DESC
        "#
    ))
    .bind(gym_id)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn get_main_image(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<Option<DbGymImage>> {
    let image = sqlx::query_as::<_, DbGymImage>(&format!(
        r#"
        SELECT {IMAGE_COLUMNS}
        FROM gym_images
        WHERE gym_id = $1 AND is_main = TRUE
        LIMIT 1
        "#
    ))
    .bind(gym_id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

/// Flips the main flag to exactly one image of the gym in a single
/// conditional update — no window with zero or two main images.
pub async fn set_main_image(pool: &Pool<Postgres>, gym_id: Uuid, image_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE gym_images SET is_main = (id = $2) WHERE gym_id = $1
        "#,
    )
    .bind(gym_id)
    .bind(image_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_image(
    pool: &Pool<Postgres>,
    id: Uuid,
    description: Option<&str>,
) -> Result<DbGymImage> {
    let image = sqlx::query_as::<_, DbGymImage>(&format!(
        r#"
        UPDATE gym_images
        SET description = $2
        WHERE id = $1
        RETURNING {IMAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(image)
}

pub async fn delete_image(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM gym_images
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
