pub mod booking;
pub mod dashboard;
pub mod occupant;
pub mod report;
pub mod room;
