use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGym {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub open_days: String,
    pub subscriber_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: gym columns plus live aggregates. `confirmed_count` is the
/// effective subscriber count computed from bookings, used to detect and
/// heal drift in the cached `subscriber_count`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymListing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub open_days: String,
    pub subscriber_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub average_rating: f64,
    pub review_count: i64,
    pub confirmed_count: i64,
}

/// Search row: aggregates plus the main image path, no drift healing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymSearchHit {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub open_days: String,
    pub subscriber_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub average_rating: f64,
    pub review_count: i64,
    pub main_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub status: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Booking joined with the gym name, for a user's own listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub status: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub gym_name: String,
}

/// Booking joined with the requesting user, for the gym owner's listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub status: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub user_first_name: String,
    pub user_last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserReview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub gym_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymImage {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub file_path: String,
    pub description: Option<String>,
    pub is_main: bool,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGymRatings {
    pub average_rating: f64,
    pub review_count: i64,
}
