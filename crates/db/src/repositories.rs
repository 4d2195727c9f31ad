pub mod booking;
pub mod gym;
pub mod gym_image;
pub mod review;
pub mod user;
