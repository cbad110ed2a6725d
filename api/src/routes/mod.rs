pub mod health;
pub mod review;
pub mod reviews;
