//! Booking occupant model, insert DTO and client view.
//!
//! The encrypted document and its hash are write-only from this crate's
//! point of view: they are never selected back into [`Occupant`].

use serde::Serialize;
use sqlx::FromRow;
use staybook_core::identity::mask_last4;
use staybook_core::meal::{MealDay, MealSummary};
use staybook_core::occupant::{OccupantSnapshot, Presence};
use staybook_core::types::{DbId, Timestamp};

use crate::models::daily_meal::DailyMeal;

/// A row from the `booking_occupants` table, without document columns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Occupant {
    pub id: DbId,
    pub booking_id: DbId,
    pub full_name: String,
    pub phone_number: String,
    pub document_last4: String,
    pub has_breakfast: bool,
    pub has_lunch: bool,
    pub has_dinner: bool,
    pub is_checked_in: bool,
    pub check_in_time: Option<Timestamp>,
    pub is_checked_out: bool,
    pub check_out_time: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Occupant {
    pub fn stored_meals(&self) -> MealSummary {
        MealSummary {
            breakfast: self.has_breakfast,
            lunch: self.has_lunch,
            dinner: self.has_dinner,
        }
    }

    pub fn presence(&self) -> Presence {
        Presence {
            is_checked_in: self.is_checked_in,
            is_checked_out: self.is_checked_out,
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
        }
    }

    pub fn snapshot(&self, days: Vec<MealDay>) -> OccupantSnapshot {
        OccupantSnapshot {
            id: self.id,
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            is_checked_in: self.is_checked_in,
            is_checked_out: self.is_checked_out,
            stored_meals: self.stored_meals(),
            days,
        }
    }
}

/// Insert DTO. Built server-side from a validated registration.
#[derive(Debug, Clone)]
pub struct CreateOccupant {
    pub booking_id: DbId,
    pub full_name: String,
    pub phone_number: String,
    pub document_encrypted: Vec<u8>,
    pub document_hash: Vec<u8>,
    pub document_last4: String,
    pub meals: MealSummary,
}

/// Occupant as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct OccupantView {
    pub id: DbId,
    pub booking_id: DbId,
    pub full_name: String,
    pub phone_number: String,
    pub identity_document: String,
    pub has_breakfast: bool,
    pub has_lunch: bool,
    pub has_dinner: bool,
    pub is_checked_in: bool,
    pub check_in_time: Option<Timestamp>,
    pub is_checked_out: bool,
    pub check_out_time: Option<Timestamp>,
    pub daily_meals: Vec<DailyMeal>,
}

impl OccupantView {
    /// Summary flags come from the day rows when any exist.
    pub fn new(occupant: Occupant, daily_meals: Vec<DailyMeal>) -> Self {
        let days: Vec<MealDay> = daily_meals.iter().map(DailyMeal::meal_day).collect();
        let meals = MealSummary::resolve(&days, occupant.stored_meals());
        Self {
            id: occupant.id,
            booking_id: occupant.booking_id,
            identity_document: mask_last4(&occupant.document_last4),
            full_name: occupant.full_name,
            phone_number: occupant.phone_number,
            has_breakfast: meals.breakfast,
            has_lunch: meals.lunch,
            has_dinner: meals.dinner,
            is_checked_in: occupant.is_checked_in,
            check_in_time: occupant.check_in_time,
            is_checked_out: occupant.is_checked_out,
            check_out_time: occupant.check_out_time,
            daily_meals,
        }
    }
}
