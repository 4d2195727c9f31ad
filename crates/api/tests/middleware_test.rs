mod test_utils;

use argon2::PasswordVerifier;
use axum::extract::FromRequestParts;
use axum::http::Request;
use axum::response::IntoResponse;
use uuid::Uuid;

use gymfinder_api::middleware::auth::{
    self, AuthUser, hash_password, issue_token, verify_password, verify_token,
};
use gymfinder_api::middleware::error_handling::AppError;
use gymfinder_core::errors::GymError;
use gymfinder_core::models::user::UserRole;

use test_utils::build_state;

#[tokio::test]
async fn test_error_handling_not_found() {
    let error = GymError::NotFound("Resource not found".to_string());
    let response = AppError(error).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_validation() {
    let error = GymError::Validation("Invalid input".to_string());
    let response = AppError(error).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_authentication() {
    let error = GymError::Authentication("Invalid token".to_string());
    let response = AppError(error).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_authorization() {
    let error = GymError::Authorization("Not authorized".to_string());
    let response = AppError(error).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_error_handling_conflict_and_invalid_state() {
    let conflict = GymError::Conflict("Duplicate booking".to_string());
    let response = AppError(conflict).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);

    let invalid_state = GymError::InvalidState("Already decided".to_string());
    let response = AppError(invalid_state).into_response();
    assert_eq!(response.status(), axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_error_handling_database() {
    let error = GymError::Database(eyre::eyre!("Database error"));
    let response = AppError(error).into_response();
    assert_eq!(
        response.status(),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_hash_password() {
    let password = "test_password";
    let hashed = hash_password(password).unwrap();

    // The hash is salted PHC output, never the plaintext
    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
}

#[tokio::test]
async fn test_verify_password_round_trip() {
    let password = "test_password";
    let hashed = hash_password(password).unwrap();

    assert!(verify_password(password, &hashed).unwrap());
    assert!(!verify_password("wrong_password", &hashed).unwrap());

    // Cross-check against argon2 directly
    let argon2 = argon2::Argon2::default();
    let parsed_hash = argon2::PasswordHash::new(&hashed).unwrap();
    assert!(
        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    );
}

#[test]
fn test_token_round_trip() {
    let user_id = Uuid::new_v4();
    let token = issue_token("secret", 3600, user_id, "lifter42", UserRole::Customer).unwrap();

    let claims = verify_token("secret", &token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.username, "lifter42");
    assert_eq!(claims.role, UserRole::Customer);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_token_rejects_wrong_secret() {
    let token = issue_token("secret", 3600, Uuid::new_v4(), "lifter42", UserRole::Customer).unwrap();
    assert!(verify_token("other-secret", &token).is_err());
}

#[test]
fn test_token_rejects_tampered_payload() {
    let token = issue_token("secret", 3600, Uuid::new_v4(), "lifter42", UserRole::Customer).unwrap();

    // Splice a forged payload between the genuine header and signature
    let mut parts: Vec<&str> = token.split('.').collect();
    let forged = base64::Engine::encode(
        &base64::engine::general_purpose::URL_SAFE_NO_PAD,
        b"{\"sub\":\"00000000-0000-0000-0000-000000000000\"}",
    );
    parts[1] = &forged;
    let tampered = parts.join(".");

    assert!(verify_token("secret", &tampered).is_err());
}

#[test]
fn test_token_rejects_expired() {
    let token = issue_token("secret", -10, Uuid::new_v4(), "lifter42", UserRole::Customer).unwrap();
    let result = verify_token("secret", &token);

    match result {
        Err(GymError::Authentication(message)) => assert!(message.contains("expired")),
        other => panic!("Expected expiry rejection, got {:?}", other.map(|c| c.sub)),
    }
}

#[test]
fn test_token_rejects_garbage() {
    assert!(verify_token("secret", "not-a-token").is_err());
    assert!(verify_token("secret", "a.b").is_err());
    assert!(verify_token("secret", "").is_err());
}

#[tokio::test]
async fn test_auth_extractor_accepts_valid_bearer() {
    let state = build_state();
    let token = auth::issue_token(
        &state.config.token_secret,
        state.config.token_expiry_seconds,
        Uuid::new_v4(),
        "lifter42",
        UserRole::GymOwner,
    )
    .unwrap();

    let request = Request::builder()
        .uri("/api/gyms/mine")
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {}", token))
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .expect("valid token should authenticate");

    assert_eq!(user.0.username, "lifter42");
    assert!(!user.is_admin());
}

#[tokio::test]
async fn test_auth_extractor_rejects_missing_header() {
    let state = build_state();

    let request = Request::builder().uri("/api/gyms/mine").body(()).unwrap();
    let (mut parts, _) = request.into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_auth_extractor_rejects_non_bearer_scheme() {
    let state = build_state();

    let request = Request::builder()
        .uri("/api/gyms/mine")
        .header(axum::http::header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(())
        .unwrap();
    let (mut parts, _) = request.into_parts();

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert!(result.is_err());
}
