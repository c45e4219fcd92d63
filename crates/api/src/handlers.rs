pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod tables;
pub mod venues;
