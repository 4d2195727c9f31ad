use crate::models::{DbGymReview, DbReview, DbUserReview};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const REVIEW_COLUMNS: &str = "id, user_id, gym_id, rating, comment, created_at";

/// Creates the user's review of a gym, or overwrites the existing one —
/// one atomic statement keyed on the (user, gym) identity, so concurrent
/// first submissions cannot produce duplicates.
pub async fn upsert_review(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    gym_id: Uuid,
    rating: i16,
    comment: &str,
) -> Result<DbReview> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let review = sqlx::query_as::<_, DbReview>(&format!(
        r#"
        INSERT INTO reviews (id, user_id, gym_id, rating, comment, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, gym_id)
        DO UPDATE SET rating = EXCLUDED.rating, comment = EXCLUDED.comment
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(gym_id)
    .bind(rating)
    .bind(comment)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(review)
}

pub async fn get_review_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbReview>> {
    let review = sqlx::query_as::<_, DbReview>(&format!(
        r#"
        SELECT {REVIEW_COLUMNS}
        FROM reviews
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(review)
}

pub async fn user_has_reviewed(pool: &Pool<Postgres>, user_id: Uuid, gym_id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reviews WHERE user_id = $1 AND gym_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(gym_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn list_reviews_by_gym(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<Vec<DbGymReview>> {
    let reviews = sqlx::query_as::<_, DbGymReview>(
        r#"
        SELECT r.id, r.user_id, r.gym_id, r.rating, r.comment, r.created_at,
               u.first_name AS user_first_name, u.last_name AS user_last_name
        FROM reviews r
        JOIN users u ON r.user_id = u.id
        WHERE r.gym_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(gym_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

pub async fn list_reviews_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbUserReview>> {
    let reviews = sqlx::query_as::<_, DbUserReview>(
        r#"
        SELECT r.id, r.user_id, r.gym_id, r.rating, r.comment, r.created_at,
               g.name AS gym_name
        FROM reviews r
        JOIN gyms g ON r.gym_id = g.id
        WHERE r.user_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

pub async fn update_review(
    pool: &Pool<Postgres>,
    id: Uuid,
    rating: i16,
    comment: &str,
) -> Result<DbReview> {
    let review = sqlx::query_as::<_, DbReview>(&format!(
        r#"
        UPDATE reviews
        SET rating = $2, comment = $3
        WHERE id = $1
        RETURNING {REVIEW_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await?;

    Ok(review)
}

pub async fn delete_review(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM reviews
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
