pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod tables;
pub mod venues;
