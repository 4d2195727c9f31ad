use std::error::Error;
use gymfinder_core::errors::{GymError, GymResult};

#[test]
fn test_gym_error_display() {
    let not_found = GymError::NotFound("Gym not found".to_string());
    let validation = GymError::Validation("Invalid input".to_string());
    let authentication = GymError::Authentication("Invalid token".to_string());
    let authorization = GymError::Authorization("Not authorized".to_string());
    let conflict = GymError::Conflict("Duplicate booking".to_string());
    let invalid_state = GymError::InvalidState("Booking already decided".to_string());
    let database = GymError::Database(eyre::eyre!("Database connection failed"));
    let internal = GymError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(not_found.to_string(), "Resource not found: Gym not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid token"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not authorized"
    );
    assert_eq!(conflict.to_string(), "Conflict: Duplicate booking");
    assert_eq!(
        invalid_state.to_string(),
        "Invalid state: Booking already decided"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let gym_error = GymError::Internal(Box::new(io_error));

    assert!(gym_error.source().is_some());
}

#[test]
fn test_gym_result() {
    let result: GymResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: GymResult<i32> = Err(GymError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_trait_implementation() {
    let eyre_error = eyre::eyre!("Database error");
    let gym_error = GymError::Database(eyre_error);

    assert!(gym_error.to_string().contains("Database error"));
}

#[test]
fn test_box_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "IO error");
    let boxed_error: Box<dyn Error + Send + Sync> = Box::new(io_error);
    let gym_error = GymError::Internal(boxed_error);

    assert!(gym_error.to_string().contains("IO error"));
}
