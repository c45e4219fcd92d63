pub mod booking;
pub mod credential;
pub mod table;
pub mod user;
pub mod venue;
