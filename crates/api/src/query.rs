//! Shared query parameter types for API handlers.
//!
//! Query structs that appear across multiple handler modules are extracted
//! here to avoid duplication.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use staybook_core::clock::Clock;
use staybook_core::types::DbId;
use staybook_db::models::room::RoomFilter;

/// Optional single-day parameter (`?date=`), defaulting to the property's
/// current date.
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<NaiveDate>,
}

impl DateParams {
    pub fn or_today(&self, clock: &dyn Clock) -> NaiveDate {
        self.date.unwrap_or_else(|| clock.today())
    }
}

/// Inclusive report range (`?from_date=&to_date=`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Filters of the booking list (`?filter=&date=&search=&user_id=`).
#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub filter: Option<String>,
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
    pub user_id: Option<DbId>,
}

/// Parameters of the coarse available-rooms listing.
///
/// Both `check_in_date`/`check_out_date` and the shorter `check_in`/
/// `check_out` spellings are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct AvailableRoomsParams {
    pub building_id: Option<DbId>,
    pub room_type_id: Option<DbId>,
    pub min_capacity: Option<i32>,
    pub floor_number: Option<i32>,
    #[serde(alias = "check_in")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(alias = "check_out")]
    pub check_out_date: Option<NaiveDate>,
}

impl AvailableRoomsParams {
    pub fn room_filter(&self) -> RoomFilter {
        RoomFilter {
            building_id: self.building_id,
            room_type_id: self.room_type_id,
            min_capacity: self.min_capacity,
            floor_number: self.floor_number,
        }
    }
}

/// Parameters of the interactive room search.
#[derive(Debug, Deserialize)]
pub struct RoomSearchParams {
    pub building_id: DbId,
    pub floor_id: Option<DbId>,
    pub date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub from_time: Option<NaiveTime>,
    pub to_time: Option<NaiveTime>,
}

/// Parameters of the per-room availability detail report.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityDetailParams {
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
}
