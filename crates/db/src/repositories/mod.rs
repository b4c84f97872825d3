//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool`, or an open transaction when the caller needs several
//! statements to commit together.

pub mod booking_repo;
pub mod daily_meal_repo;
pub mod occupant_repo;
pub mod room_repo;

pub use booking_repo::BookingRepo;
pub use daily_meal_repo::DailyMealRepo;
pub use occupant_repo::OccupantRepo;
pub use room_repo::RoomRepo;
