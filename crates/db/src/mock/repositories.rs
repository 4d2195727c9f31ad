use chrono::NaiveDate;
use gymfinder_core::models::booking::BookingStatus;
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbBooking, DbGym, DbGymBooking, DbGymImage, DbGymListing, DbGymRatings, DbReview, DbUser,
    DbUserBooking,
};
use crate::repositories::booking::StatusUpdate;

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            username: &'static str,
            email: &'static str,
            password_hash: &'static str,
            first_name: &'static str,
            last_name: &'static str,
            role: &'static str,
        ) -> eyre::Result<DbUser>;

        pub async fn get_user_by_id(&self, id: Uuid) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_username(
            &self,
            username: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn username_exists(&self, username: &'static str) -> eyre::Result<bool>;

        pub async fn email_exists(&self, email: &'static str) -> eyre::Result<bool>;

        pub async fn verify_password(
            &self,
            id: Uuid,
            password: &'static str,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub GymRepo {
        pub async fn get_gym_by_id(&self, id: Uuid) -> eyre::Result<Option<DbGym>>;

        pub async fn list_gyms(&self) -> eyre::Result<Vec<DbGymListing>>;

        pub async fn list_gyms_by_owner(
            &self,
            owner_id: Uuid,
        ) -> eyre::Result<Vec<DbGymListing>>;

        pub async fn reconcile_subscriber_count(&self, gym_id: Uuid) -> eyre::Result<i64>;

        pub async fn get_gym_ratings(&self, gym_id: Uuid) -> eyre::Result<DbGymRatings>;

        pub async fn delete_gym(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn create_booking(
            &self,
            user_id: Uuid,
            gym_id: Uuid,
            starts_on: Option<NaiveDate>,
            ends_on: Option<NaiveDate>,
            note: Option<&'static str>,
        ) -> eyre::Result<DbBooking>;

        pub async fn get_booking_by_id(&self, id: Uuid) -> eyre::Result<Option<DbBooking>>;

        pub async fn has_active_booking(
            &self,
            user_id: Uuid,
            gym_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn list_bookings_by_user(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbUserBooking>>;

        pub async fn list_bookings_by_gym(
            &self,
            gym_id: Uuid,
        ) -> eyre::Result<Vec<DbGymBooking>>;

        pub async fn update_booking_status(
            &self,
            id: Uuid,
            new_status: BookingStatus,
        ) -> eyre::Result<StatusUpdate>;

        pub async fn update_booking(
            &self,
            id: Uuid,
            starts_on: Option<NaiveDate>,
            ends_on: Option<NaiveDate>,
            note: Option<&'static str>,
        ) -> eyre::Result<DbBooking>;

        pub async fn delete_booking(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub ReviewRepo {
        pub async fn upsert_review(
            &self,
            user_id: Uuid,
            gym_id: Uuid,
            rating: i16,
            comment: &'static str,
        ) -> eyre::Result<DbReview>;

        pub async fn get_review_by_id(&self, id: Uuid) -> eyre::Result<Option<DbReview>>;

        pub async fn user_has_reviewed(
            &self,
            user_id: Uuid,
            gym_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn delete_review(&self, id: Uuid) -> eyre::Result<()>;
    }
}

mock! {
    pub GymImageRepo {
        pub async fn create_image(
            &self,
            gym_id: Uuid,
            file_path: &'static str,
            description: Option<&'static str>,
            is_main: bool,
        ) -> eyre::Result<DbGymImage>;

        pub async fn get_image_by_id(&self, id: Uuid) -> eyre::Result<Option<DbGymImage>>;

        pub async fn list_images_by_gym(&self, gym_id: Uuid) -> eyre::Result<Vec<DbGymImage>>;

        pub async fn set_main_image(&self, gym_id: Uuid, image_id: Uuid) -> eyre::Result<()>;

        pub async fn delete_image(&self, id: Uuid) -> eyre::Result<()>;
    }
}
