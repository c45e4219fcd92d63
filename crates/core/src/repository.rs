pub mod booking;
pub mod table;

pub use booking::BookingRepository;
pub use table::TableRepository;
