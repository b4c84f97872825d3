//! Room rows joined with their building, floor and type.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staybook_core::report::RoomInfo;
use staybook_core::types::DbId;

/// Room status value that makes a room eligible for listing.
pub const STATUS_AVAILABLE: &str = "Available";

/// A room row with its reference data resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomListing {
    pub id: DbId,
    pub room_number: String,
    pub status: String,
    pub occupied: Option<i32>,
    pub building_id: DbId,
    pub building_name: String,
    pub floor_id: DbId,
    pub floor_number: i32,
    pub room_type_id: Option<DbId>,
    pub room_type_name: Option<String>,
    pub capacity: Option<i32>,
}

impl RoomListing {
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            id: self.id,
            room_number: self.room_number.clone(),
            building_name: self.building_name.clone(),
            room_type_name: self.room_type_name.clone(),
        }
    }
}

/// Structural filters of the available-rooms listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub building_id: Option<DbId>,
    pub room_type_id: Option<DbId>,
    pub min_capacity: Option<i32>,
    pub floor_number: Option<i32>,
}
