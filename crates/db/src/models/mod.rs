//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` struct matching the database row
//! - `Deserialize` request DTOs for inserts and edits
//! - Conversions into the `staybook_core` domain types

pub mod booking;
pub mod daily_meal;
pub mod occupant;
pub mod room;
