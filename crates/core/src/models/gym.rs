use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{GymError, GymResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGymRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub monthly_price: f64,
    pub opens_at: String,
    pub closes_at: String,
    pub open_days: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGymRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub monthly_price: Option<f64>,
    pub opens_at: Option<String>,
    pub closes_at: Option<String>,
    pub open_days: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymResponse {
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

/// Listing row: gym plus live review aggregates. The subscriber count here
/// is the reconciled value, never the stale cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymListingResponse {
    #[serde(flatten)]
    pub gym: GymResponse,
    pub average_rating: f64,
    pub review_count: i64,
}

/// Search result row; includes the main image path when one is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymSearchResponse {
    #[serde(flatten)]
    pub gym: GymResponse,
    pub average_rating: f64,
    pub review_count: i64,
    pub main_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymListResponse<T> {
    pub count: usize,
    pub gyms: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingsResponse {
    pub average_rating: f64,
    pub review_count: i64,
}

impl RatingsResponse {
    /// Averages are reported to one decimal place, 0.0 when unreviewed.
    pub fn from_parts(average: f64, review_count: i64) -> Self {
        Self {
            average_rating: round_rating(average),
            review_count,
        }
    }
}

pub fn round_rating(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

/// Accepts `HH:MM` or `HH:MM:SS` and normalizes to a canonical time of day.
pub fn parse_opening_hour(raw: &str) -> GymResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| GymError::Validation(format!("Invalid opening hour: {}", raw)))
}
