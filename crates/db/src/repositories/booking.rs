use crate::models::{DbBooking, DbGymBooking, DbUserBooking};
use chrono::{NaiveDate, Utc};
use eyre::{Result, eyre};
use gymfinder_core::models::booking::BookingStatus;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str =
    "id, user_id, gym_id, status, starts_on, ends_on, note, requested_at, responded_at";

/// Outcome of a decision attempt. `NotPending` means the booking had already
/// been decided (or deleted) by the time the transaction got to it.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    Applied(DbBooking),
    NotPending,
}

pub async fn create_booking(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    gym_id: Uuid,
    starts_on: Option<NaiveDate>,
    ends_on: Option<NaiveDate>,
    note: Option<&str>,
) -> Result<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating booking: id={}, user_id={}, gym_id={}", id, user_id, gym_id);

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, user_id, gym_id, status, starts_on, ends_on, note, requested_at)
        VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(gym_id)
    .bind(starts_on)
    .bind(ends_on)
    .bind(note)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Create-time guard: true while the user has a pending or confirmed
/// booking for the gym.
pub async fn has_active_booking(pool: &Pool<Postgres>, user_id: Uuid, gym_id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM bookings
            WHERE user_id = $1 AND gym_id = $2
              AND status IN ('pending', 'confirmed')
        )
        "#,
    )
    .bind(user_id)
    .bind(gym_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn list_bookings_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbUserBooking>> {
    let bookings = sqlx::query_as::<_, DbUserBooking>(
        r#"
        SELECT b.id, b.user_id, b.gym_id, b.status, b.starts_on, b.ends_on, b.note,
               b.requested_at, b.responded_at,
               g.name AS gym_name
        FROM bookings b
        JOIN gyms g ON b.gym_id = g.id
        WHERE b.user_id = $1
        ORDER BY b.requested_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn list_bookings_by_gym(pool: &Pool<Postgres>, gym_id: Uuid) -> Result<Vec<DbGymBooking>> {
    let bookings = sqlx::query_as::<_, DbGymBooking>(
        r#"
        SELECT b.id, b.user_id, b.gym_id, b.status, b.starts_on, b.ends_on, b.note,
               b.requested_at, b.responded_at,
               u.first_name AS user_first_name, u.last_name AS user_last_name,
               u.email AS user_email
        FROM bookings b
        JOIN users u ON b.user_id = u.id
        WHERE b.gym_id = $1
        ORDER BY b.requested_at DESC
        "#,
    )
    .bind(gym_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Decides a pending booking and, on confirmation, bumps the gym's
/// subscriber count — one transaction, no partial state.
///
/// The gym row is locked `FOR UPDATE` first, so concurrent confirmations
/// and reconciling reads serialize on it; the increment itself is atomic
/// SQL. The status write only matches a `pending` row, which is what makes
/// confirmed/rejected terminal even under races.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    new_status: BookingStatus,
) -> Result<StatusUpdate> {
    let mut tx = pool.begin().await?;

    let gym_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT gym_id FROM bookings WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| eyre!("Booking not found"))?;

    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM gyms WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(gym_id)
    .fetch_one(&mut *tx)
    .await?;

    let decided = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, responded_at = $3
        WHERE id = $1 AND status = 'pending'
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new_status.as_str())
    .bind(Utc::now())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(booking) = decided else {
        tx.rollback().await?;
        return Ok(StatusUpdate::NotPending);
    };

    if new_status == BookingStatus::Confirmed {
        sqlx::query(
            r#"
            UPDATE gyms SET subscriber_count = subscriber_count + 1 WHERE id = $1
            "#,
        )
        .bind(gym_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!("Booking {} decided: {}", id, new_status);

    Ok(StatusUpdate::Applied(booking))
}

pub async fn update_booking(
    pool: &Pool<Postgres>,
    id: Uuid,
    starts_on: Option<NaiveDate>,
    ends_on: Option<NaiveDate>,
    note: Option<&str>,
) -> Result<DbBooking> {
    let booking = get_booking_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Booking not found"))?;

    let starts_on = starts_on.or(booking.starts_on);
    let ends_on = ends_on.or(booking.ends_on);
    let note = note.or(booking.note.as_deref());

    let updated_booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET starts_on = $2, ends_on = $3, note = $4
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(starts_on)
    .bind(ends_on)
    .bind(note)
    .fetch_one(pool)
    .await?;

    Ok(updated_booking)
}

pub async fn delete_booking(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
