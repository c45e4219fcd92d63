pub mod booking;
pub mod range;
pub mod table;
pub mod user;
pub mod venue;
