use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(255) NOT NULL UNIQUE,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            last_login_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create gyms table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gyms (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES users(id),
            name VARCHAR(255) NOT NULL,
            address VARCHAR(255) NOT NULL,
            city VARCHAR(255) NOT NULL,
            postal_code VARCHAR(16) NULL,
            phone VARCHAR(32) NULL,
            email VARCHAR(255) NULL,
            description TEXT NULL,
            monthly_price DOUBLE PRECISION NOT NULL,
            opens_at TIME NOT NULL,
            closes_at TIME NOT NULL,
            open_days VARCHAR(255) NOT NULL,
            subscriber_count BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            gym_id UUID NOT NULL REFERENCES gyms(id),
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            starts_on DATE NULL,
            ends_on DATE NULL,
            note TEXT NULL,
            requested_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            responded_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reviews table; one review per user per gym
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            gym_id UUID NOT NULL REFERENCES gyms(id),
            rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_review_per_user_per_gym UNIQUE (user_id, gym_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create gym_images table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gym_images (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            gym_id UUID NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
            file_path VARCHAR(512) NOT NULL,
            description TEXT NULL,
            is_main BOOLEAN NOT NULL DEFAULT FALSE,
            uploaded_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_gyms_owner_id ON gyms(owner_id)",
        "CREATE INDEX IF NOT EXISTS idx_gyms_city ON gyms(city)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_gym_id ON bookings(gym_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_gym_id_status ON bookings(gym_id, status)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_gym_id ON reviews(gym_id)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_user_id ON reviews(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_gym_images_gym_id ON gym_images(gym_id)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
