use crate::models::DbUser;
use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_user(
    pool: &Pool<Postgres>,
    username: &str,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, username={}, role={}", id, username, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, username, email, password_hash, first_name, last_name, role, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8)
        RETURNING id, username, email, password_hash, first_name, last_name, role, active, created_at, last_login_at
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, role, active, created_at, last_login_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username(pool: &Pool<Postgres>, username: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, role, active, created_at, last_login_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn username_exists(pool: &Pool<Postgres>, username: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)
        "#,
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn email_exists(pool: &Pool<Postgres>, email: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)
        "#,
    )
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

pub async fn list_users(pool: &Pool<Postgres>) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name, role, active, created_at, last_login_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn update_user(
    pool: &Pool<Postgres>,
    id: Uuid,
    email: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    role: Option<&str>,
) -> Result<DbUser> {
    let user = get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("User not found"))?;

    let email = email.unwrap_or(&user.email);
    let first_name = first_name.unwrap_or(&user.first_name);
    let last_name = last_name.unwrap_or(&user.last_name);
    let role = role.unwrap_or(&user.role);

    let updated_user = sqlx::query_as::<_, DbUser>(
        r#"
        UPDATE users
        SET email = $2, first_name = $3, last_name = $4, role = $5
        WHERE id = $1
        RETURNING id, username, email, password_hash, first_name, last_name, role, active, created_at, last_login_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(updated_user)
}

pub async fn update_password(pool: &Pool<Postgres>, id: Uuid, password_hash: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_last_login(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET last_login_at = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_user(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn verify_password(pool: &Pool<Postgres>, id: Uuid, password: &str) -> Result<bool> {
    let user = get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("User not found"))?;

    let parsed_hash = argon2::PasswordHash::new(&user.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid)
}
