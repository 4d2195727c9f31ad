use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::GymError;

/// Booking lifecycle. A booking starts `pending`; the gym owner (or an
/// admin) decides it exactly once, to `confirmed` or `rejected`. Both
/// outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// Confirmed and rejected bookings cannot move again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

impl FromStr for BookingStatus {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(GymError::Validation(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub gym_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub status: BookingStatus,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub note: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// A booking as shown to the requesting user, with the gym name joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBookingResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub gym_name: String,
}

/// A booking as shown to the gym owner, with the requester joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymBookingResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse<T> {
    pub count: usize,
    pub bookings: Vec<T>,
}
