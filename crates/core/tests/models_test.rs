use chrono::{NaiveTime, Utc};
use gymfinder_core::envelope::ApiResponse;
use gymfinder_core::models::{
    booking::{BookingResponse, BookingStatus},
    gym::{RatingsResponse, parse_opening_hour, round_rating},
    review::{MAX_RATING, MIN_RATING, validate_rating},
    user::{UserProfile, UserRole},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, to_string};
use uuid::Uuid;

#[test]
fn test_user_profile_serialization() {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    let profile = UserProfile {
        id,
        username: "lifter42".to_string(),
        email: "lifter42@example.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: UserRole::Customer,
        active: true,
        created_at,
        last_login_at: None,
    };

    let json = to_string(&profile).expect("Failed to serialize profile");
    let deserialized: UserProfile = from_str(&json).expect("Failed to deserialize profile");

    assert_eq!(deserialized.id, profile.id);
    assert_eq!(deserialized.username, profile.username);
    assert_eq!(deserialized.role, profile.role);
    assert_eq!(deserialized.created_at, profile.created_at);
    assert!(json.contains("\"customer\""));
}

#[test]
fn test_booking_response_serialization() {
    let booking = BookingResponse {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        gym_id: Uuid::new_v4(),
        status: BookingStatus::Confirmed,
        starts_on: Some("2024-06-01".parse().unwrap()),
        ends_on: None,
        note: Some("Morning sessions only".to_string()),
        requested_at: Utc::now(),
        responded_at: Some(Utc::now()),
    };

    let json = to_string(&booking).expect("Failed to serialize booking");
    let deserialized: BookingResponse = from_str(&json).expect("Failed to deserialize booking");

    assert_eq!(deserialized.id, booking.id);
    assert_eq!(deserialized.status, BookingStatus::Confirmed);
    assert!(json.contains("\"confirmed\""));
}

#[rstest]
#[case("pending", BookingStatus::Pending)]
#[case("confirmed", BookingStatus::Confirmed)]
#[case("rejected", BookingStatus::Rejected)]
fn test_booking_status_round_trip(#[case] raw: &str, #[case] status: BookingStatus) {
    assert_eq!(raw.parse::<BookingStatus>().unwrap(), status);
    assert_eq!(status.as_str(), raw);
}

#[test]
fn test_booking_status_rejects_unknown_values() {
    assert!("canceled".parse::<BookingStatus>().is_err());
    assert!("".parse::<BookingStatus>().is_err());
    assert!("Confirmed".parse::<BookingStatus>().is_err());
}

#[test]
fn test_booking_status_terminality() {
    assert!(!BookingStatus::Pending.is_terminal());
    assert!(BookingStatus::Confirmed.is_terminal());
    assert!(BookingStatus::Rejected.is_terminal());
}

#[rstest]
#[case("customer", UserRole::Customer)]
#[case("gym_owner", UserRole::GymOwner)]
#[case("admin", UserRole::Admin)]
fn test_user_role_round_trip(#[case] raw: &str, #[case] role: UserRole) {
    assert_eq!(raw.parse::<UserRole>().unwrap(), role);
    assert_eq!(role.as_str(), raw);
}

#[test]
fn test_user_role_rejects_unknown_values() {
    assert!("owner".parse::<UserRole>().is_err());
    assert!("superuser".parse::<UserRole>().is_err());
}

#[test]
fn test_rating_bounds() {
    for rating in MIN_RATING..=MAX_RATING {
        assert!(validate_rating(rating).is_ok());
    }

    // Out-of-range submissions are rejected before any write happens
    assert!(validate_rating(0).is_err());
    assert!(validate_rating(6).is_err());
    assert!(validate_rating(-3).is_err());
}

#[test]
fn test_rating_rounding() {
    assert_eq!(round_rating(4.25), 4.3);
    assert_eq!(round_rating(3.333333), 3.3);
    assert_eq!(round_rating(0.0), 0.0);
    assert_eq!(round_rating(5.0), 5.0);
}

#[test]
fn test_ratings_response_defaults_to_zero() {
    let ratings = RatingsResponse::from_parts(0.0, 0);
    assert_eq!(ratings.average_rating, 0.0);
    assert_eq!(ratings.review_count, 0);

    let ratings = RatingsResponse::from_parts(4.6666, 3);
    assert_eq!(ratings.average_rating, 4.7);
    assert_eq!(ratings.review_count, 3);
}

#[rstest]
#[case("09:00", NaiveTime::from_hms_opt(9, 0, 0).unwrap())]
#[case("09:00:00", NaiveTime::from_hms_opt(9, 0, 0).unwrap())]
#[case("22:30", NaiveTime::from_hms_opt(22, 30, 0).unwrap())]
fn test_parse_opening_hour(#[case] raw: &str, #[case] expected: NaiveTime) {
    assert_eq!(parse_opening_hour(raw).unwrap(), expected);
}

#[test]
fn test_parse_opening_hour_rejects_garbage() {
    assert!(parse_opening_hour("9am").is_err());
    assert!(parse_opening_hour("25:00").is_err());
    assert!(parse_opening_hour("").is_err());
}

#[test]
fn test_envelope_shape() {
    let ok = ApiResponse::ok("Done", serde_json::json!({"id": 1}));
    let json = to_string(&ok).unwrap();
    assert!(json.contains("\"success\":true"));
    assert!(json.contains("\"message\":\"Done\""));

    let err = ApiResponse::error("Something went wrong");
    assert!(!err.success);
    assert_eq!(err.data, serde_json::json!({}));
}
