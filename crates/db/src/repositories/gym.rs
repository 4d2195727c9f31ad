use crate::models::{DbGym, DbGymListing, DbGymRatings, DbGymSearchHit};
use chrono::{NaiveTime, Utc};
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const GYM_COLUMNS: &str = "id, owner_id, name, address, city, postal_code, phone, email, \
                           description, monthly_price, opens_at, closes_at, open_days, \
                           subscriber_count, created_at, updated_at";

pub async fn create_gym(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    name: &str,
    address: &str,
    city: &str,
    postal_code: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    description: Option<&str>,
    monthly_price: f64,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    open_days: &str,
) -> Result<DbGym> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating gym: id={}, owner_id={}, name={}", id, owner_id, name);

    let gym = sqlx::query_as::<_, DbGym>(&format!(
        r#"
        INSERT INTO gyms (id, owner_id, name, address, city, postal_code, phone, email,
                          description, monthly_price, opens_at, closes_at, open_days,
                          subscriber_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, $14, $14)
        RETURNING {GYM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(address)
    .bind(city)
    .bind(postal_code)
    .bind(phone)
    .bind(email)
    .bind(description)
    .bind(monthly_price)
    .bind(opens_at)
    .bind(closes_at)
    .bind(open_days)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(gym)
}

pub async fn get_gym_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbGym>> {
    let gym = sqlx::query_as::<_, DbGym>(&format!(
        r#"
        SELECT {GYM_COLUMNS}
        FROM gyms
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(gym)
}

/// Lists all gyms with live review aggregates, healing any subscriber-count
/// drift before returning. Ordered by effective popularity, then rating,
/// then recency.
pub async fn list_gyms(pool: &Pool<Postgres>) -> Result<Vec<DbGymListing>> {
    let mut listings = sqlx::query_as::<_, DbGymListing>(
        r#"
        SELECT g.id, g.owner_id, g.name, g.address, g.city, g.postal_code, g.phone, g.email,
               g.description, g.monthly_price, g.opens_at, g.closes_at, g.open_days,
               g.subscriber_count, g.created_at, g.updated_at,
               COALESCE(AVG(r.rating), 0)::DOUBLE PRECISION AS average_rating,
               COUNT(DISTINCT r.id) AS review_count,
               (SELECT COUNT(*) FROM bookings b
                WHERE b.gym_id = g.id AND b.status = 'confirmed') AS confirmed_count
        FROM gyms g
        LEFT JOIN reviews r ON g.id = r.gym_id
        GROUP BY g.id
        ORDER BY confirmed_count DESC, average_rating DESC, g.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    heal_listing_drift(pool, &mut listings).await?;

    Ok(listings)
}

pub async fn list_gyms_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<DbGymListing>> {
    let mut listings = sqlx::query_as::<_, DbGymListing>(
        r#"
        SELECT g.id, g.owner_id, g.name, g.address, g.city, g.postal_code, g.phone, g.email,
               g.description, g.monthly_price, g.opens_at, g.closes_at, g.open_days,
               g.subscriber_count, g.created_at, g.updated_at,
               COALESCE(AVG(r.rating), 0)::DOUBLE PRECISION AS average_rating,
               COUNT(DISTINCT r.id) AS review_count,
               (SELECT COUNT(*) FROM bookings b
                WHERE b.gym_id = g.id AND b.status = 'confirmed') AS confirmed_count
        FROM gyms g
        LEFT JOIN reviews r ON g.id = r.gym_id
        WHERE g.owner_id = $1
        GROUP BY g.id
        ORDER BY g.created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    heal_listing_drift(pool, &mut listings).await?;

    Ok(listings)
}

/// Rewrites the cached subscriber count for every listed gym where it
/// disagrees with the confirmed-booking count, so readers never observe
/// stale counters past one listing call.
async fn heal_listing_drift(pool: &Pool<Postgres>, listings: &mut [DbGymListing]) -> Result<()> {
    for listing in listings.iter_mut() {
        if listing.subscriber_count != listing.confirmed_count {
            tracing::debug!(
                "Subscriber count drift on gym {}: cached={}, effective={}",
                listing.id,
                listing.subscriber_count,
                listing.confirmed_count
            );
            listing.subscriber_count = reconcile_subscriber_count(pool, listing.id).await?;
        }
    }

    Ok(())
}

/// Recomputes the confirmed-booking count for one gym and stores it, holding
/// the same gym-row lock the booking decision takes. Idempotent; returns the
/// reconciled count.
pub async fn reconcile_subscriber_count(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let cached = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT subscriber_count FROM gyms WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(gym_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| eyre!("Gym not found"))?;

    let effective = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM bookings WHERE gym_id = $1 AND status = 'confirmed'
        "#,
    )
    .bind(gym_id)
    .fetch_one(&mut *tx)
    .await?;

    if cached != effective {
        sqlx::query(
            r#"
            UPDATE gyms SET subscriber_count = $2 WHERE id = $1
            "#,
        )
        .bind(gym_id)
        .bind(effective)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(effective)
}

pub async fn search_gyms_by_city(pool: &Pool<Postgres>, city: &str) -> Result<Vec<DbGymSearchHit>> {
    let pattern = format!("%{}%", city);

    let hits = sqlx::query_as::<_, DbGymSearchHit>(
        r#"
        SELECT g.id, g.owner_id, g.name, g.address, g.city, g.postal_code, g.phone, g.email,
               g.description, g.monthly_price, g.opens_at, g.closes_at, g.open_days,
               g.subscriber_count, g.created_at, g.updated_at,
               COALESCE(AVG(r.rating), 0)::DOUBLE PRECISION AS average_rating,
               COUNT(r.id) AS review_count,
               (SELECT file_path FROM gym_images
                WHERE gym_id = g.id AND is_main = TRUE LIMIT 1) AS main_image
        FROM gyms g
        LEFT JOIN reviews r ON g.id = r.gym_id
        WHERE g.city ILIKE $1
        GROUP BY g.id
        ORDER BY g.created_at DESC
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(hits)
}

pub async fn update_gym(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    address: Option<&str>,
    city: Option<&str>,
    postal_code: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    description: Option<&str>,
    monthly_price: Option<f64>,
    opens_at: Option<NaiveTime>,
    closes_at: Option<NaiveTime>,
    open_days: Option<&str>,
) -> Result<DbGym> {
    let gym = get_gym_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Gym not found"))?;

    let name = name.unwrap_or(&gym.name);
    let address = address.unwrap_or(&gym.address);
    let city = city.unwrap_or(&gym.city);
    let postal_code = postal_code.or(gym.postal_code.as_deref());
    let phone = phone.or(gym.phone.as_deref());
    let email = email.or(gym.email.as_deref());
    let description = description.or(gym.description.as_deref());
    let monthly_price = monthly_price.unwrap_or(gym.monthly_price);
    let opens_at = opens_at.unwrap_or(gym.opens_at);
    let closes_at = closes_at.unwrap_or(gym.closes_at);
    let open_days = open_days.unwrap_or(&gym.open_days);

    let updated_gym = sqlx::query_as::<_, DbGym>(&format!(
        r#"
        UPDATE gyms
        SET name = $2, address = $3, city = $4, postal_code = $5, phone = $6, email = $7,
            description = $8, monthly_price = $9, opens_at = $10, closes_at = $11,
            open_days = $12, updated_at = $13
        WHERE id = $1
        RETURNING {GYM_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(address)
    .bind(city)
    .bind(postal_code)
    .bind(phone)
    .bind(email)
    .bind(description)
    .bind(monthly_price)
    .bind(opens_at)
    .bind(closes_at)
    .bind(open_days)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(updated_gym)
}

pub async fn delete_gym(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM gyms
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Average rating and review count, computed live from reviews.
pub async fn get_gym_ratings(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<DbGymRatings> {
    let ratings = sqlx::query_as::<_, DbGymRatings>(
        r#"
        SELECT COALESCE(AVG(rating), 0)::DOUBLE PRECISION AS average_rating,
               COUNT(id) AS review_count
        FROM reviews
        WHERE gym_id = $1
        "#,
    )
    .bind(gym_id)
    .fetch_one(pool)
    .await?;

    Ok(ratings)
}
