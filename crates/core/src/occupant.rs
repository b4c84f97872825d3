//! Occupant lifecycle: registration, check-in/check-out and the meal
//! cancellation cascade that runs on check-out.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::booking::StayWindow;
use crate::error::CoreError;
use crate::meal::{generate_plan, DailyMealPlan, MealDay, MealFlags, MealKind, MealSummary};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lunch is still cancellable on check-out before 11:30 local time.
pub const LUNCH_CUTOFF_MINUTES: u32 = 11 * 60 + 30;

/// Dinner is still cancellable on check-out before 19:00 local time.
pub const DINNER_CUTOFF_MINUTES: u32 = 19 * 60;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{1,4}\s\d{6,14}$").expect("valid regex"));

static DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{12}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Snapshot and stage
// ---------------------------------------------------------------------------

/// An occupant as loaded alongside its booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantSnapshot {
    pub id: DbId,
    pub full_name: String,
    pub phone_number: String,
    pub is_checked_in: bool,
    pub is_checked_out: bool,
    /// Flat flags stored on the occupant row.
    pub stored_meals: MealSummary,
    pub days: Vec<MealDay>,
}

impl OccupantSnapshot {
    pub fn meal_day(&self, date: NaiveDate) -> Option<&MealDay> {
        self.days.iter().find(|d| d.plan.date == date)
    }

    /// Entitlements for a date: that day's record when present, else the
    /// flat flags. Cancellation is not considered.
    pub fn entitlements_on(&self, date: NaiveDate) -> MealSummary {
        match self.meal_day(date) {
            Some(day) => day.plan.entitlements(),
            None => self.stored_meals,
        }
    }

    pub fn meal_summary(&self) -> MealSummary {
        MealSummary::resolve(&self.days, self.stored_meals)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OccupantStage {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

/// Presence flags and the audit stamps that accompany them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub is_checked_in: bool,
    pub is_checked_out: bool,
    pub check_in_time: Option<Timestamp>,
    pub check_out_time: Option<Timestamp>,
}

impl Presence {
    pub fn stage(&self) -> OccupantStage {
        if self.is_checked_out {
            OccupantStage::CheckedOut
        } else if self.is_checked_in {
            OccupantStage::CheckedIn
        } else {
            OccupantStage::NotCheckedIn
        }
    }
}

// ---------------------------------------------------------------------------
// Status changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusRequest {
    pub is_checked_in: bool,
    pub is_checked_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceChange {
    pub presence: Presence,
    /// The occupant checked out with this request; the meal cascade runs.
    pub checked_out_now: bool,
}

/// Apply a check-in/check-out request to the current presence.
///
/// Check-out is terminal and requires a check-in, either earlier or in the
/// same request. Every transition into checked-in stamps the check-in time,
/// so undoing a check-in and redoing it records the later arrival; undoing
/// alone keeps the last stamp. The check-out stamp is set once.
pub fn apply_status_request(
    current: &Presence,
    request: StatusRequest,
    now: Timestamp,
) -> Result<PresenceChange, CoreError> {
    if current.is_checked_out && !request.is_checked_out {
        return Err(CoreError::Validation(
            "Occupant has already checked out; check-out cannot be reverted".to_string(),
        ));
    }
    if request.is_checked_out && !request.is_checked_in {
        return Err(CoreError::Validation(
            "Occupant must be checked in before checking out".to_string(),
        ));
    }

    let check_in_time = if request.is_checked_in && !current.is_checked_in {
        Some(now)
    } else {
        current.check_in_time
    };
    let checked_out_now = request.is_checked_out && !current.is_checked_out;
    let check_out_time = if checked_out_now {
        Some(now)
    } else {
        current.check_out_time
    };

    Ok(PresenceChange {
        presence: Presence {
            is_checked_in: request.is_checked_in,
            is_checked_out: request.is_checked_out,
            check_in_time,
            check_out_time,
        },
        checked_out_now,
    })
}

// ---------------------------------------------------------------------------
// Check-out cascade
// ---------------------------------------------------------------------------

fn minute_of_day(at: NaiveDateTime) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Cancel the meals an occupant will no longer eat after checking out at
/// `local_now`.
///
/// Every entitled meal on a later date is cancelled. On the check-out date,
/// lunch and dinner are cancelled only before their cutoffs; breakfast is
/// kept. Flags are only ever set. Returns the ids of days that changed.
pub fn cancel_meals_on_checkout(days: &mut [MealDay], local_now: NaiveDateTime) -> Vec<DbId> {
    let today = local_now.date();
    let minute = minute_of_day(local_now);

    let mut changed = Vec::new();
    for day in days.iter_mut() {
        let kinds: &[MealKind] = if day.plan.date > today {
            &MealKind::ALL
        } else if day.plan.date == today {
            match (minute < LUNCH_CUTOFF_MINUTES, minute < DINNER_CUTOFF_MINUTES) {
                (true, _) => &[MealKind::Lunch, MealKind::Dinner],
                (false, true) => &[MealKind::Dinner],
                (false, false) => &[],
            }
        } else {
            &[]
        };

        let mut touched = false;
        for kind in kinds {
            let slot = day.plan.slot_mut(*kind);
            if slot.entitled && !slot.cancelled {
                slot.cancelled = true;
                touched = true;
            }
        }
        if touched {
            changed.push(day.id);
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DailyMealInput {
    pub meal_date: NaiveDate,
    #[serde(flatten)]
    pub flags: MealFlags,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OccupantRegistration {
    pub booking_id: DbId,
    #[validate(length(min = 1, max = 100, message = "Full name must be between 1 and 100 characters"))]
    pub full_name: String,
    #[validate(regex(path = *PHONE_RE, message = "Phone number must look like '+91 9876543210'"))]
    pub phone_number: String,
    #[validate(regex(path = *DOCUMENT_RE, message = "Identity document number must be exactly 12 digits"))]
    pub identity_document: String,
    #[serde(default)]
    pub has_breakfast: bool,
    #[serde(default)]
    pub has_lunch: bool,
    #[serde(default)]
    pub has_dinner: bool,
    #[serde(default)]
    pub daily_meals: Vec<DailyMealInput>,
}

impl OccupantRegistration {
    pub fn flat_meals(&self) -> MealSummary {
        MealSummary {
            breakfast: self.has_breakfast,
            lunch: self.has_lunch,
            dinner: self.has_dinner,
        }
    }
}

/// Meal rows and summary flags to write for a new occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPlan {
    pub summary: MealSummary,
    pub days: Vec<DailyMealPlan>,
}

pub fn validate_registration(registration: &OccupantRegistration) -> Result<(), CoreError> {
    registration
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    if registration.full_name.trim().is_empty() {
        return Err(CoreError::Validation("Full name must not be blank".to_string()));
    }
    Ok(())
}

/// Decide the meal plan of a new occupant.
///
/// Supplied days are stored as given and the summary becomes their OR;
/// otherwise one day per stay date is generated from the flat flags.
pub fn plan_registration(
    registration: &OccupantRegistration,
    stay: &StayWindow,
) -> Result<RegistrationPlan, CoreError> {
    if registration.daily_meals.is_empty() {
        let summary = registration.flat_meals();
        return Ok(RegistrationPlan {
            summary,
            days: generate_plan(stay.check_in, stay.check_out, summary),
        });
    }

    let mut seen = HashSet::new();
    let days: Vec<DailyMealPlan> = registration
        .daily_meals
        .iter()
        .map(|input| {
            if !seen.insert(input.meal_date) {
                return Err(CoreError::Validation(format!(
                    "Duplicate meal plan entry for {}",
                    input.meal_date
                )));
            }
            Ok(input.flags.into_plan(input.meal_date))
        })
        .collect::<Result<_, _>>()?;

    Ok(RegistrationPlan {
        summary: MealSummary::from_days(&days),
        days,
    })
}

// ---------------------------------------------------------------------------
// Meal edits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MealEdit {
    pub id: DbId,
    #[serde(flatten)]
    pub flags: MealFlags,
}

/// Overwrite the flags of the addressed days and recompute the summary.
///
/// Edits for ids the occupant does not own are ignored. Returns the ids that
/// were overwritten and the new summary over all days.
pub fn apply_meal_edits(days: &mut [MealDay], edits: &[MealEdit]) -> (Vec<DbId>, MealSummary) {
    let mut applied = Vec::new();
    for edit in edits {
        if let Some(day) = days.iter_mut().find(|d| d.id == edit.id) {
            day.plan = edit.flags.into_plan(day.plan.date);
            if !applied.contains(&day.id) {
                applied.push(day.id);
            }
        }
    }
    let summary = MealSummary::from_days(days.iter().map(|d| &d.plan));
    (applied, summary)
}
