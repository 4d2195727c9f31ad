//! # Authentication Module
//!
//! Password hashing and verification (Argon2) plus the signed bearer token
//! used on every authenticated endpoint.
//!
//! The token is three base64url segments, `header.payload.signature`: the
//! header names the scheme, the payload carries the user id, username, role
//! and issue/expiry timestamps, and the signature is an HMAC-SHA256 over
//! `header.payload` keyed with the configured secret. Signature mismatch and
//! expiry are both reported as the same authentication failure.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use eyre::Result;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

use gymfinder_core::errors::{GymError, GymResult};
use gymfinder_core::models::user::UserRole;

use crate::ApiState;
use crate::middleware::error_handling::AppError;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_TYPE: &str = "GFT";
const TOKEN_ALG: &str = "HS256";

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub username: String,
    pub role: UserRole,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expires at, unix seconds
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    typ: String,
    alg: String,
}

/// Hashes a password with Argon2 and a fresh random salt, returning the
/// PHC-format string stored in the database.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a plaintext password against a stored PHC-format hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = argon2::PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issues a signed bearer token for the given user identity.
pub fn issue_token(
    secret: &str,
    expiry_seconds: i64,
    user_id: Uuid,
    username: &str,
    role: UserRole,
) -> GymResult<String> {
    let header = TokenHeader {
        typ: TOKEN_TYPE.to_string(),
        alg: TOKEN_ALG.to_string(),
    };
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        iat: now,
        exp: now + expiry_seconds,
    };

    let header_b64 = URL_SAFE_NO_PAD.encode(encode_json(&header)?);
    let payload_b64 = URL_SAFE_NO_PAD.encode(encode_json(&claims)?);
    let signing_input = format!("{}.{}", header_b64, payload_b64);

    let signature = URL_SAFE_NO_PAD.encode(sign(secret, &signing_input)?);

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verifies a bearer token and returns its claims.
///
/// Malformed tokens, bad signatures and expired tokens all surface as
/// `Authentication` errors; callers cannot distinguish them.
pub fn verify_token(secret: &str, token: &str) -> GymResult<Claims> {
    let mut parts = token.splitn(3, '.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(GymError::Authentication("Invalid token".to_string()));
    };

    let signing_input = format!("{}.{}", header_b64, payload_b64);
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| GymError::Authentication("Invalid token".to_string()))?;

    let mut mac = mac_for(secret)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| GymError::Authentication("Invalid token".to_string()))?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| GymError::Authentication("Invalid token".to_string()))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|_| GymError::Authentication("Invalid token".to_string()))?;

    if claims.exp < Utc::now().timestamp() {
        return Err(GymError::Authentication("Token expired".to_string()));
    }

    Ok(claims)
}

fn sign(secret: &str, input: &str) -> GymResult<Vec<u8>> {
    let mut mac = mac_for(secret)?;
    mac.update(input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn mac_for(secret: &str) -> GymResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| GymError::Internal(Box::new(e)))
}

fn encode_json<T: Serialize>(value: &T) -> GymResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| GymError::Internal(Box::new(e)))
}

/// Extractor for authenticated endpoints: pulls the bearer token out of the
/// `Authorization` header and verifies it against the configured secret.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.sub
    }

    pub fn is_admin(&self) -> bool {
        self.0.role.is_admin()
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(GymError::Authentication("Missing bearer token".to_string()))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError(GymError::Authentication("Missing bearer token".to_string()))
        })?;

        let claims = verify_token(&state.config.token_secret, token).map_err(AppError)?;

        Ok(AuthUser(claims))
    }
}
