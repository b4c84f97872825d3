//! Booking entity model and DTOs.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use staybook_core::booking::{BookingStatus, StayWindow};
use staybook_core::error::CoreError;
use staybook_core::types::{DbId, Timestamp};

/// A booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub client_kind_id: Option<DbId>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub booking_start: Option<NaiveDateTime>,
    pub booking_end: Option<NaiveDateTime>,
    pub status: String,
    pub cancellation_remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Booking {
    pub fn stay(&self) -> StayWindow {
        StayWindow {
            check_in: self.check_in_date,
            check_out: self.check_out_date,
            start: self.booking_start,
            end: self.booking_end,
        }
    }

    pub fn status(&self) -> Result<BookingStatus, CoreError> {
        BookingStatus::from_str_value(&self.status)
    }
}

/// A booking row with the room it is for, as shown in booking lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub room_number: String,
    pub building_name: String,
}

/// DTO for creating a new booking. Status always starts as `Booked`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub room_id: DbId,
    pub user_id: DbId,
    pub client_kind_id: Option<DbId>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub booking_start: Option<NaiveDateTime>,
    pub booking_end: Option<NaiveDateTime>,
}

impl CreateBooking {
    pub fn stay(&self) -> StayWindow {
        StayWindow {
            check_in: self.check_in_date,
            check_out: self.check_out_date,
            start: self.booking_start,
            end: self.booking_end,
        }
    }
}

/// DTO replacing the editable fields of a booking. Status is changed only
/// through the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBooking {
    pub room_id: DbId,
    pub client_kind_id: Option<DbId>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub booking_start: Option<NaiveDateTime>,
    pub booking_end: Option<NaiveDateTime>,
}

impl UpdateBooking {
    pub fn stay(&self) -> StayWindow {
        StayWindow {
            check_in: self.check_in_date,
            check_out: self.check_out_date,
            start: self.booking_start,
            end: self.booking_end,
        }
    }
}

/// DTO for a booking status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: BookingStatus,
    pub remarks: Option<String>,
}
